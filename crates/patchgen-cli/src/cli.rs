use std::path::PathBuf;

use clap::Parser;
use patchgen_delta::{DiffConfig, DEFAULT_MAX_LEN, MIN_MATCH};

#[derive(Debug, Parser)]
#[command(
    name = "patchgen",
    about = "Write a COPY/INSERT delta that turns ORIGINAL into FINAL",
    version,
)]
pub struct Cli {
    /// File the delta copies spans from
    #[arg(value_name = "ORIGINAL")]
    pub original: PathBuf,

    /// File the delta describes
    #[arg(value_name = "FINAL")]
    pub final_path: PathBuf,

    /// Output file; created or truncated
    #[arg(value_name = "DELTA")]
    pub delta: PathBuf,

    /// Longest span probed at each position, and the largest single COPY
    #[arg(long, default_value_t = DEFAULT_MAX_LEN)]
    pub max_len: usize,

    /// Matches of this many bytes or fewer are sent as literal data
    #[arg(long, default_value_t = MIN_MATCH)]
    pub min_match: usize,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set. `-v` shows every record written.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    pub fn config(&self) -> DiffConfig {
        DiffConfig::default()
            .with_max_len(self.max_len)
            .with_min_match(self.min_match)
    }
}
