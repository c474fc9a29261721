// Console - owns the visible snapshot and serves derived views
use crate::application::dashboard_service::DashboardService;
use crate::application::metrics::compute;
use crate::domain::snapshot::DashboardSnapshot;
use crate::domain::view::DerivedView;
use crate::infrastructure::config::{MetricsSettings, RefreshDiscipline};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct Console {
    service: DashboardService,
    discipline: RefreshDiscipline,
    metrics: MetricsSettings,
    published: Arc<RwLock<Option<Arc<DashboardSnapshot>>>>,
}

impl Console {
    pub fn new(
        service: DashboardService,
        discipline: RefreshDiscipline,
        metrics: MetricsSettings,
    ) -> Self {
        Self {
            service,
            discipline,
            metrics,
            published: Arc::new(RwLock::new(None)),
        }
    }

    /// Run one aggregation and publish it according to the refresh discipline.
    ///
    /// Returns the snapshot that is visible afterwards, which under `LastStarted` may
    /// be a newer one than this call produced.
    pub async fn refresh(&self) -> Arc<DashboardSnapshot> {
        let snapshot = Arc::new(self.service.refresh().await);

        let mut published = self.published.write().await;
        let accept = match (self.discipline, published.as_ref()) {
            (_, None) => true,
            (RefreshDiscipline::LastCompleted, Some(_)) => true,
            (RefreshDiscipline::LastStarted, Some(current)) => snapshot.sequence > current.sequence,
        };

        if accept {
            *published = Some(snapshot.clone());
            snapshot
        } else {
            tracing::debug!(
                "Discarding refresh #{} (superseded by #{})",
                snapshot.sequence,
                published.as_ref().map(|s| s.sequence).unwrap_or_default()
            );
            published.as_ref().cloned().unwrap_or(snapshot)
        }
    }

    /// The visible snapshot, or an all-pending one before the first refresh settles.
    pub async fn latest_snapshot(&self) -> Arc<DashboardSnapshot> {
        self.published
            .read()
            .await
            .clone()
            .unwrap_or_else(|| Arc::new(DashboardSnapshot::pending()))
    }

    pub async fn derived_view(&self) -> DerivedView {
        let snapshot = self.latest_snapshot().await;
        compute(&snapshot, &self.metrics)
    }

    /// Refresh every `interval` until `shutdown` flips to true.
    pub fn spawn_auto_refresh(
        &self,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let console = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        console.refresh().await;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("Auto-refresh stopped");
        })
    }
}
