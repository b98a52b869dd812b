use std::path::PathBuf;

use capsule_core::{
    CapsuleConfig, EnvelopeRules, DEFAULT_FOOTER_MARKER, DEFAULT_NEXT_PAGE_MARKER,
};
use capsule_engine::{BookOptions, FetchSettings};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use url::Url;

use crate::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "capsule-binder")]
#[command(
    about = "Bind the posts of a gemini capsule into one ePub book",
    long_about = None
)]
pub struct Cli {
    /// Index page listing the capsule's posts, e.g. gemini://text.eapl.mx/posts
    pub base_url: String,

    /// Label of the link that leads to the next index page
    #[arg(long, default_value = DEFAULT_NEXT_PAGE_MARKER)]
    pub next_page_marker: String,

    /// Directory the book is written to
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Book title (defaults to the capsule host)
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, default_value = "")]
    pub author: String,

    #[arg(long, default_value = "en")]
    pub language: String,

    /// Output file stem (defaults to the title)
    #[arg(long)]
    pub filename: Option<String>,

    /// Lines of navigation header at the top of every post
    #[arg(long, default_value_t = 2)]
    pub header_lines: usize,

    /// Line that starts the footer of every post
    #[arg(long, default_value = DEFAULT_FOOTER_MARKER)]
    pub footer_marker: String,

    /// Maximum redirects followed per request
    #[arg(long, default_value_t = 5)]
    pub redirect_limit: usize,

    /// Answer input prompts on the terminal instead of skipping the page
    #[arg(short, long)]
    pub interactive: bool,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn capsule_config(&self) -> CapsuleConfig {
        CapsuleConfig::new(self.base_url.trim())
            .with_next_page_marker(self.next_page_marker.clone())
            .with_envelope(EnvelopeRules {
                header_lines: self.header_lines,
                footer_marker: self.footer_marker.clone(),
            })
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            redirect_limit: self.redirect_limit,
            ..FetchSettings::default()
        }
    }

    pub fn book_options(&self, run_date: NaiveDate) -> BookOptions {
        let title = self
            .title
            .clone()
            .or_else(|| {
                Url::parse(self.base_url.trim())
                    .ok()
                    .and_then(|url| url.host_str().map(str::to_string))
            })
            .unwrap_or_else(|| "Capsule".to_string());

        let mut options = BookOptions::new(title, self.output_dir.clone(), run_date);
        options.author = self.author.clone();
        options.language = self.language.clone();
        options.filename = self.filename.clone();
        options
    }
}
