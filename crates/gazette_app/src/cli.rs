use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

#[derive(Debug, Parser)]
#[command(
    name = "gazette",
    version,
    about = "Extract and explore articles from newspaper PDFs"
)]
pub struct Cli {
    /// RON configuration file (defaults to ./gazette.ron when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Base URL of the processing API
    #[arg(long, global = true, env = "GAZETTE_API_URL")]
    pub api_url: Option<String>,
    /// Delay between status checks, in milliseconds
    #[arg(long, global = true, env = "GAZETTE_POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,
    /// Also write the log to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
    /// Log progress details to the terminal
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            poll_interval_ms: self.poll_interval_ms,
            log_file: self.log_file.clone(),
        }
    }
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Upload a PDF, wait for processing and show the extracted articles
    Process {
        /// Path to the newspaper PDF
        pdf: PathBuf,
        /// Start with this text search applied
        #[arg(long)]
        search: Option<String>,
        /// Start with this keyword filter selected
        #[arg(long)]
        keyword: Option<String>,
        /// Keep exploring the result at a prompt
        #[arg(short, long)]
        interactive: bool,
    },
    /// Search every stored article on the backend
    Search {
        query: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List stored articles tagged with a keyword
    Keyword {
        keyword: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one stored article
    Article { id: String },
}
