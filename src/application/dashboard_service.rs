// Dashboard service - Concurrent aggregation of every source into one snapshot
use crate::application::sources::DashboardSource;
use crate::domain::snapshot::DashboardSnapshot;
use crate::domain::source_result::{SourceKind, SourceResult, UnavailableReason};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn DashboardSource>,
    source_timeout: Duration,
    next_sequence: Arc<AtomicU64>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn DashboardSource>, source_timeout: Duration) -> Self {
        Self {
            source,
            source_timeout,
            next_sequence: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Fetch every source concurrently and wait for all of them to settle.
    ///
    /// Never fails: each source lands in the snapshot as `Success` or `Unavailable`
    /// independently of the others. The sequence number is taken when the refresh
    /// starts, so overlapping refreshes can be ordered by when they were initiated.
    pub async fn refresh(&self) -> DashboardSnapshot {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let started_at = Utc::now();
        tracing::debug!("Refresh #{} started", sequence);

        let (health, analytics, workflows, projects) = tokio::join!(
            self.settle(SourceKind::Health, self.source.fetch_health()),
            self.settle(SourceKind::Analytics, self.source.fetch_analytics()),
            self.settle(SourceKind::Workflows, self.source.fetch_workflows()),
            self.settle(SourceKind::Projects, self.source.fetch_projects()),
        );

        let snapshot = DashboardSnapshot {
            sequence,
            started_at,
            completed_at: Utc::now(),
            analytics,
            workflows,
            projects,
            health,
        };

        let unavailable = snapshot.unavailable_sources();
        if unavailable.is_empty() {
            tracing::info!("Refresh #{} settled, all sources available", sequence);
        } else {
            tracing::info!(
                "Refresh #{} settled with {} unavailable source(s)",
                sequence,
                unavailable.len()
            );
        }

        snapshot
    }

    async fn settle<T>(
        &self,
        kind: SourceKind,
        fetch: impl Future<Output = SourceResult<T>>,
    ) -> SourceResult<T> {
        let result = tokio::time::timeout(self.source_timeout, fetch)
            .await
            .unwrap_or(SourceResult::Unavailable(UnavailableReason::Timeout));

        match &result {
            SourceResult::Success(_) => tracing::debug!("Source {} available", kind),
            SourceResult::Unavailable(reason) => {
                tracing::warn!("Source {} unavailable: {}", kind, reason)
            }
        }

        result
    }
}
