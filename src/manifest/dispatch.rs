use futures::future::join_all;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use tracing::warn;

use crate::error::ScanError;
use crate::lookup::VulnerabilityLookup;
use crate::models::Dependency;

/// Check `deps` one at a time, in order. The first failure ends the scan.
pub async fn check_sequential<L: VulnerabilityLookup>(
    lookup: &L,
    deps: &[Dependency],
) -> Result<(), ScanError> {
    for dep in deps {
        lookup.check_one(dep).await?;
    }
    Ok(())
}

/// Start a check for every dependency, then wait for all of them.
///
/// Checks are futures polled together on the calling task: they run
/// concurrently, not in parallel on separate threads. Without
/// `max_concurrency` every check is in flight at once. A failing check
/// does not stop the others: it is logged and recorded on the collaborator.
/// Returns how many checks failed.
pub async fn check_concurrent<L: VulnerabilityLookup>(
    lookup: &L,
    deps: &[Dependency],
    max_concurrency: Option<usize>,
    progress: &ProgressBar,
) -> usize {
    let checks = deps.iter().map(|dep| async move {
        let result = lookup.check_one(dep).await;
        progress.inc(1);
        match result {
            Ok(()) => false,
            Err(err) => {
                warn!(dependency = %dep, error = %format!("{:#}", err), "lookup failed");
                lookup.record_failure(dep, &err);
                true
            }
        }
    });

    let failed: Vec<bool> = match max_concurrency {
        None => join_all(checks).await,
        Some(limit) => stream::iter(checks).buffer_unordered(limit.max(1)).collect().await,
    };

    failed.into_iter().filter(|f| *f).count()
}
