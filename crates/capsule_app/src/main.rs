mod cli;
mod logging;
mod run;

use clap::Parser;

use capsule_logging::{capsule_error, capsule_info};

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log.into(), cli.level());

    let summary = run::run(&cli)
        .await
        .inspect_err(|err| capsule_error!("{err:#}"))?;

    capsule_info!(
        "{} chapters, {} skipped",
        summary.chapter_count,
        summary.skipped_count
    );
    println!("{}", summary.output_path.display());
    Ok(())
}
