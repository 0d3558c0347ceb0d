use std::path::PathBuf;

use clap::Parser;

use crate::logging::LogDestination;

/// Crawl a site from a seed URL and download the images its pages reference.
#[derive(Debug, Parser)]
#[command(name = "image-crawler", version)]
pub struct Cli {
    /// Page the crawl starts from.
    pub seed: String,

    /// URL prefix pages must start with. Defaults to the seed.
    #[arg(long)]
    pub scope: Option<String>,

    /// Number of crawl workers. Defaults to the number of CPUs.
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Directory images are written under.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Allowed image extension, e.g. `.png`. Repeatable; replaces the defaults.
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    /// Images must be wider than this many pixels.
    #[arg(long)]
    pub min_width: Option<u32>,

    /// Images must be taller than this many pixels.
    #[arg(long)]
    pub min_height: Option<u32>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// RON file with crawl settings; command-line flags take precedence.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,

    /// Exit once every discovered page has been handled instead of waiting for Enter.
    #[arg(long)]
    pub until_idle: bool,

    /// Log every fetch and admission.
    #[arg(short, long)]
    pub verbose: bool,
}
