//! Manifest readers and the scan driver.
//!
//! - [`requirements`] — `name==version` lines, UTF-8 with a UTF-16 fallback;
//!   checks run one after another in file order.
//! - [`package_json`] — `dependencies` merged with `devDependencies`; checks run
//!   concurrently and are joined before the report is rendered.

pub mod dispatch;
pub mod package_json;
pub mod requirements;

#[cfg(test)]
pub(crate) mod testing;

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::config::LookupConfig;
use crate::error::ScanError;
use crate::lookup::{OsvClient, VulnerabilityLookup};
use crate::models::{Dependency, ManifestFormat, ManifestHandle};

/// A manifest bound to the collaborator that checks its dependencies.
pub struct Manifest<L> {
    handle: ManifestHandle,
    lookup: L,
    max_concurrency: Option<usize>,
    show_progress: bool,
}

/// Build a manifest scanner from a type token (`-r` or `-p`).
///
/// The token is checked before `lookup_config` runs, so an unknown token is
/// reported without reading any file. The manifest path is not touched here;
/// a missing file is reported by [`Manifest::parse`].
pub fn create<F>(
    discriminator: &str,
    path: &Path,
    lookup_config: F,
) -> Result<Manifest<OsvClient>, ScanError>
where
    F: FnOnce() -> anyhow::Result<LookupConfig>,
{
    let format: ManifestFormat = discriminator.parse()?;
    let config = lookup_config()?;
    let lookup = OsvClient::new(format.ecosystem(), &config)?;
    Ok(Manifest::new(format, path, lookup).max_concurrency(config.max_concurrency))
}

impl<L: VulnerabilityLookup> Manifest<L> {
    pub fn new(format: ManifestFormat, path: impl Into<PathBuf>, lookup: L) -> Self {
        Self {
            handle: ManifestHandle {
                path: path.into(),
                format,
            },
            lookup,
            max_concurrency: None,
            show_progress: false,
        }
    }

    /// Cap in-flight checks for `package.json` scans. `None` means no cap.
    pub fn max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn handle(&self) -> &ManifestHandle {
        &self.handle
    }

    #[cfg(test)]
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Read the manifest and extract its dependencies without checking them.
    pub fn extract(&self) -> Result<Vec<Dependency>, ScanError> {
        match self.handle.format {
            ManifestFormat::Requirements => requirements::read(&self.handle.path),
            ManifestFormat::PackageManifest => package_json::read(&self.handle.path),
        }
    }

    /// Check every declared dependency and return the rendered report.
    pub async fn parse(&self) -> Result<String, ScanError> {
        let deps = self.extract()?;
        info!(
            path = %self.handle.path.display(),
            format = %self.handle.format,
            dependencies = deps.len(),
            "scanning manifest"
        );

        match self.handle.format {
            ManifestFormat::Requirements => {
                dispatch::check_sequential(&self.lookup, &deps).await?;
            }
            ManifestFormat::PackageManifest => {
                let progress = self.progress_bar(deps.len());
                let failed =
                    dispatch::check_concurrent(&self.lookup, &deps, self.max_concurrency, &progress)
                        .await;
                progress.finish_and_clear();
                info!(checked = deps.len(), failed, "all lookups finished");
            }
        }

        Ok(self.lookup.render_report())
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
