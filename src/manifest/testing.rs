//! In-memory lookup collaborator for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::lookup::VulnerabilityLookup;
use crate::models::Dependency;

#[derive(Default)]
pub struct RecordingLookup {
    fail_on: Option<String>,
    checked: Mutex<Vec<Dependency>>,
    failures: Mutex<Vec<Dependency>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl RecordingLookup {
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn checked(&self) -> Vec<Dependency> {
        self.checked.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<Dependency> {
        self.failures.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VulnerabilityLookup for RecordingLookup {
    async fn check_one(&self, dep: &Dependency) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on.as_deref() == Some(dep.name.as_str()) {
            bail!("lookup for {} timed out", dep);
        }
        self.checked.lock().unwrap().push(dep.clone());
        Ok(())
    }

    fn record_failure(&self, dep: &Dependency, _error: &anyhow::Error) {
        self.failures.lock().unwrap().push(dep.clone());
    }

    fn render_report(&self) -> String {
        let mut lines: Vec<String> = self.checked().iter().map(ToString::to_string).collect();
        lines.sort();
        format!("checked {}: {}", lines.len(), lines.join(", "))
    }
}
