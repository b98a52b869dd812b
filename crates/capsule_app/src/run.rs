use std::sync::Arc;

use anyhow::{bail, Context};
use capsule_engine::{
    write_book, CapsuleCrawler, ExportSummary, GeminiClient, PostAssembler, StdinPrompt,
};
use capsule_logging::{capsule_info, capsule_warn};
use chrono::Local;

use crate::cli::Cli;

/// Crawl the capsule, render every post and write the book.
pub async fn run(cli: &Cli) -> anyhow::Result<ExportSummary> {
    let config = cli.capsule_config();
    config.validate()?;

    let mut client = GeminiClient::new(cli.fetch_settings())?;
    if cli.interactive {
        client = client.with_input(Arc::new(StdinPrompt));
    }

    capsule_info!("reading capsule {}", config.base_url);
    let posts = CapsuleCrawler::new(&client, &config)
        .crawl()
        .await
        .context("crawling the post index")?;
    if posts.is_empty() {
        bail!("no dated posts found at {}", config.base_url);
    }

    let report = PostAssembler::new(&client, &config).assemble(&posts).await;
    if !report.skipped.is_empty() {
        capsule_warn!(
            "{} of {} posts skipped",
            report.skipped.len(),
            posts.len()
        );
    }
    if report.rendered.is_empty() {
        bail!("none of the {} posts could be fetched", posts.len());
    }

    let options = cli.book_options(Local::now().date_naive());
    let summary = write_book(&report.rendered, &report.skipped, &options)
        .with_context(|| format!("writing the book to {}", options.output_dir.display()))?;
    Ok(summary)
}
