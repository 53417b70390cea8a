//! `cve-hunter` — check the dependencies declared in a manifest for known vulnerabilities.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Pick the manifest reader from the type token ([`manifest::create`]), then
//!    load lookup config ([`config::load_config`]).
//! 3. Extract dependencies and check each one against the advisory database
//!    ([`lookup`]): one at a time for `requirements.txt`, all at once for `package.json`.
//! 4. Print the aggregated report ([`report`]).
//! 5. On failure print one line and exit with the code of its class ([`error::ScanError`]).

mod cli;
mod config;
mod error;
mod lookup;
mod manifest;
mod models;
mod report;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::load_config;
use error::ScanError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<String, ScanError> {
    let manifest = manifest::create(&cli.format, &cli.path, || {
        let mut config = load_config(cli.config.as_deref())?;
        if cli.max_concurrency.is_some() {
            config.lookup.max_concurrency = cli.max_concurrency;
        }
        Ok(config.lookup)
    })?
    .show_progress(!cli.quiet);
    tracing::debug!(handle = ?manifest.handle(), "manifest ready");

    manifest.parse().await
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "cve_hunter=debug" } else { "cve_hunter=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn broken_config() -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[lookup").unwrap();
        f
    }

    #[tokio::test]
    async fn test_unknown_token_wins_over_broken_config() {
        let config = broken_config();
        let cli = Cli::try_parse_from([
            OsStr::new("cve-hunter"),
            OsStr::new("-x"),
            OsStr::new("nowhere.txt"),
            OsStr::new("--config"),
            config.path().as_os_str(),
        ])
        .unwrap();

        let err = run(cli).await.unwrap_err();

        assert!(matches!(err, ScanError::UnsupportedInput(_)));
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_broken_config_is_unexpected_for_known_token() {
        let config = broken_config();
        let cli = Cli::try_parse_from([
            OsStr::new("cve-hunter"),
            OsStr::new("-r"),
            OsStr::new("requirements.txt"),
            OsStr::new("--config"),
            config.path().as_os_str(),
        ])
        .unwrap();

        let err = run(cli).await.unwrap_err();

        assert!(matches!(err, ScanError::Unexpected(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_missing_manifest_is_input_access() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        let manifest = dir.path().join("requirements.txt");
        let cli = Cli::try_parse_from([
            OsStr::new("cve-hunter"),
            OsStr::new("-r"),
            manifest.as_os_str(),
            OsStr::new("--config"),
            config.as_os_str(),
            OsStr::new("--quiet"),
        ])
        .unwrap();

        let err = run(cli).await.unwrap_err();

        assert!(matches!(err, ScanError::InputAccess { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
