use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{Advisory, Finding, VulnerabilityLookup};
use crate::config::LookupConfig;
use crate::models::{Dependency, Ecosystem};
use crate::report;

/// Checks dependencies against an OSV-compatible `/v1/query` endpoint.
///
/// Findings from concurrent checks are appended under a mutex; the lock is
/// never held across an `.await`.
pub struct OsvClient {
    client: Client,
    endpoint: String,
    ecosystem: Ecosystem,
    findings: Mutex<Vec<Finding>>,
}

impl OsvClient {
    pub fn new(ecosystem: Ecosystem, config: &LookupConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("cve-hunter/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::with_client(client, config.endpoint.clone(), ecosystem))
    }

    fn with_client(client: Client, endpoint: String, ecosystem: Ecosystem) -> Self {
        Self {
            client,
            endpoint,
            ecosystem,
            findings: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, finding: Finding) {
        self.findings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(finding);
    }

    /// Snapshot of everything recorded so far.
    pub fn findings(&self) -> Vec<Finding> {
        self.findings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl VulnerabilityLookup for OsvClient {
    async fn check_one(&self, dep: &Dependency) -> Result<()> {
        let body = json!({
            "package": {
                "name": dep.name,
                "ecosystem": self.ecosystem.osv_name(),
            },
            "version": query_version(self.ecosystem, &dep.version),
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("lookup for {} failed", dep))?;

        let status = response.status();
        if !status.is_success() {
            bail!("advisory database answered {} for {}", status, dep);
        }

        let data: QueryResponse = response
            .json()
            .await
            .with_context(|| format!("malformed advisory response for {}", dep))?;

        let advisories: Vec<Advisory> = data.vulns.into_iter().map(Advisory::from).collect();
        debug!(dependency = %dep, advisories = advisories.len(), "checked");

        if advisories.is_empty() {
            self.record(Finding::Clean(dep.clone()));
        } else {
            self.record(Finding::Vulnerable(dep.clone(), advisories));
        }
        Ok(())
    }

    fn record_failure(&self, dep: &Dependency, error: &anyhow::Error) {
        self.record(Finding::Failed(dep.clone(), format!("{:#}", error)));
    }

    fn render_report(&self) -> String {
        report::render(self.ecosystem, &self.findings())
    }
}

/// Version string sent to the database.
///
/// npm manifests usually carry a range operator in front of the version
/// (`^4.17.1`); the database wants the bare version.
fn query_version(ecosystem: Ecosystem, version: &str) -> &str {
    match ecosystem {
        Ecosystem::Npm => version
            .trim()
            .trim_start_matches(|c: char| matches!(c, '^' | '~' | '=' | 'v'))
            .trim(),
        Ecosystem::PyPI => version.trim(),
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    vulns: Vec<OsvVuln>,
}

#[derive(Debug, Deserialize)]
struct OsvVuln {
    id: String,
    #[serde(default)]
    aliases: Vec<String>,
    summary: Option<String>,
    database_specific: Option<serde_json::Value>,
}

impl From<OsvVuln> for Advisory {
    fn from(vuln: OsvVuln) -> Self {
        let severity = vuln
            .database_specific
            .as_ref()
            .and_then(|d| d.get("severity"))
            .and_then(|s| s.as_str())
            .map(str::to_string);
        Advisory {
            id: vuln.id,
            aliases: vuln.aliases,
            summary: vuln.summary.filter(|s| !s.is_empty()),
            severity,
        }
    }
}
