use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::default_targets;
use crate::models::{Strategy, Target};

#[derive(Parser, Debug)]
#[command(name = "linkpulse")]
#[command(about = "Check whether a set of HTTP endpoints is up, using different concurrency strategies.")]
pub struct CommandLine {
    /// JSON file with probe timings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Per-probe timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Fixed wait used by the fire-and-forget strategy, in milliseconds
    #[arg(long, global = true)]
    pub wait_ms: Option<u64>,

    /// Print one JSON object per result instead of plain text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe the targets with a single strategy
    #[command(alias = "r")]
    Run {
        #[arg(short, long, value_enum, default_value_t = Strategy::Channel)]
        strategy: Strategy,
        /// URLs to probe; defaults to the built-in list
        urls: Vec<String>,
    },
    /// Run every strategy against the same targets and summarize
    #[command(alias = "c")]
    Compare {
        urls: Vec<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

pub fn targets_or_default(urls: Vec<String>) -> Vec<Target> {
    if urls.is_empty() {
        default_targets()
    } else {
        urls.into_iter().map(Target::from).collect()
    }
}
