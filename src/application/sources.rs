// Source traits - seams between the use cases and the backend clients
use crate::domain::knowledge::{KnowledgeAnswer, KnowledgeDocument, KnowledgeQuery};
use crate::domain::source_result::SourceResult;
use crate::domain::sources::{AnalyticsData, HealthData, ProjectsData, WorkflowsData};
use async_trait::async_trait;

/// One fetch per dashboard resource. Implementations never retry and never fail past
/// this boundary: every error is folded into `SourceResult::Unavailable`.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn fetch_health(&self) -> SourceResult<HealthData>;

    async fn fetch_analytics(&self) -> SourceResult<AnalyticsData>;

    async fn fetch_workflows(&self) -> SourceResult<WorkflowsData>;

    async fn fetch_projects(&self) -> SourceResult<ProjectsData>;
}

#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Ranked matches plus a generated summary.
    async fn query(&self, request: &KnowledgeQuery) -> SourceResult<KnowledgeAnswer>;

    /// Every indexed document.
    async fn dump(&self) -> SourceResult<Vec<KnowledgeDocument>>;
}
