use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration structure, deserialized from `.cve-hunter/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Vulnerability lookup settings.
    #[serde(default)]
    pub lookup: LookupConfig,
}

/// How dependencies are checked against the advisory database.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// OSV-compatible query endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on in-flight checks for `package.json` scans.
    /// Unset means one check per dependency, all at once.
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

fn default_endpoint() -> String {
    "https://api.osv.dev/v1/query".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            max_concurrency: None,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `./.cve-hunter/config.toml`
/// 3. `~/.config/cve-hunter/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = Path::new(".cve-hunter").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("cve-hunter").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_unbounded() {
        let cfg = Config::default();
        assert_eq!(cfg.lookup.endpoint, "https://api.osv.dev/v1/query");
        assert_eq!(cfg.lookup.timeout_secs, 30);
        assert_eq!(cfg.lookup.max_concurrency, None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[lookup]").unwrap();
        writeln!(f, "max_concurrency = 8").unwrap();

        let cfg = load_config(Some(f.path())).unwrap();
        assert_eq!(cfg.lookup.max_concurrency, Some(8));
        assert_eq!(cfg.lookup.timeout_secs, 30);
    }

    #[test]
    fn test_empty_file_is_default() {
        let f = NamedTempFile::new().unwrap();
        let cfg = load_config(Some(f.path())).unwrap();
        assert_eq!(cfg.lookup.max_concurrency, None);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[lookup").unwrap();
        assert!(load_config(Some(f.path())).is_err());
    }
}
