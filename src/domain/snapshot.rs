// Dashboard snapshot domain model
use super::source_result::{SourceKind, SourceResult, UnavailableReason};
use super::sources::{AnalyticsData, HealthData, ProjectsData, WorkflowsData};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One fully-settled aggregation of every source. Never mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub sequence: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub analytics: SourceResult<AnalyticsData>,
    pub workflows: SourceResult<WorkflowsData>,
    pub projects: SourceResult<ProjectsData>,
    pub health: SourceResult<HealthData>,
}

impl DashboardSnapshot {
    /// Placeholder used before the first refresh settles.
    pub fn pending() -> Self {
        let now = Utc::now();
        Self {
            sequence: 0,
            started_at: now,
            completed_at: now,
            analytics: SourceResult::pending(),
            workflows: SourceResult::pending(),
            projects: SourceResult::pending(),
            health: SourceResult::pending(),
        }
    }

    pub fn reason_for(&self, kind: SourceKind) -> Option<&UnavailableReason> {
        match kind {
            SourceKind::Health => self.health.reason(),
            SourceKind::Analytics => self.analytics.reason(),
            SourceKind::Workflows => self.workflows.reason(),
            SourceKind::Projects => self.projects.reason(),
        }
    }

    pub fn unavailable_sources(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|kind| self.reason_for(*kind).is_some())
            .collect()
    }
}
