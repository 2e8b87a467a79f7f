//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::source::{Language, SectionId};

/// A terminal news reader grouped by section and source.
#[derive(Debug, Parser)]
#[command(name = "newsdeck", version, about)]
pub struct Config {
    /// Root URL of the news API.
    #[arg(long, env = "NEWSDECK_API_URL", default_value = "http://localhost:5000/api")]
    pub api_url: String,

    /// Sections to show, in display order (e.g. `--sections 3,1,2`).
    ///
    /// When omitted the user's saved selection is fetched from the API.
    #[arg(long, value_delimiter = ',')]
    pub sections: Option<Vec<SectionId>>,

    /// Language code for translated titles and summaries.
    #[arg(long, default_value = "EN")]
    pub language: String,

    /// Bearer token for authenticated endpoints.
    #[arg(long, env = "NEWSDECK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File that receives the application log.
    #[arg(long, default_value = "newsdeck.log")]
    pub log_file: PathBuf,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Config {
    pub fn language(&self) -> Language {
        Language::new(&self.language)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
