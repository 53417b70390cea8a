use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "cve-hunter",
    about = "Check the dependencies of a manifest for known vulnerabilities",
    version
)]
pub struct Cli {
    /// Manifest type: -r for requirements.txt, -p for package.json
    #[arg(value_name = "TYPE", allow_hyphen_values = true)]
    pub format: String,

    /// Path to the manifest file
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Config file [default: ./.cve-hunter/config.toml, fallback ~/.config/cve-hunter/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum number of lookups in flight for package.json scans (default: unbounded)
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Log skipped lines and lookup details to stderr
    #[arg(long)]
    pub verbose: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}
