//! Vulnerability lookup collaborators.
//!
//! A collaborator checks one [`Dependency`] at a time and accumulates what it
//! finds; once every check has returned, [`VulnerabilityLookup::render_report`]
//! turns the accumulated findings into the text printed to the user.
//!
//! Checks for `package.json` manifests run concurrently against one shared
//! collaborator, so implementations must guard their findings themselves.

pub mod osv;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Dependency;

pub use osv::OsvClient;

#[async_trait]
pub trait VulnerabilityLookup: Send + Sync {
    /// Look up `dep` and record the outcome.
    async fn check_one(&self, dep: &Dependency) -> Result<()>;

    /// Record that checking `dep` failed, so the report still accounts for it.
    fn record_failure(&self, dep: &Dependency, error: &anyhow::Error);

    /// Render everything recorded since construction.
    fn render_report(&self) -> String;
}

/// One advisory affecting a checked dependency.
#[derive(Debug, Clone, PartialEq)]
pub struct Advisory {
    pub id: String,
    pub aliases: Vec<String>,
    pub summary: Option<String>,
    pub severity: Option<String>,
}

/// What a single check produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    Clean(Dependency),
    Vulnerable(Dependency, Vec<Advisory>),
    Failed(Dependency, String),
}

impl Finding {
    pub fn dependency(&self) -> &Dependency {
        match self {
            Finding::Clean(dep) | Finding::Vulnerable(dep, _) | Finding::Failed(dep, _) => dep,
        }
    }
}
