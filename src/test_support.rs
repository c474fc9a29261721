// Shared helpers for tests: live HTTP peers and a scripted dashboard source
use crate::application::sources::DashboardSource;
use crate::domain::source_result::{SourceKind, SourceResult, UnavailableReason};
use crate::domain::sources::{
    ActivityEvent, AnalyticsData, Bill, HealthData, HealthStatus, Project, ProjectStatus,
    ProjectsData, RevenuePoint, WorkflowStat, WorkflowsData,
};
use async_trait::async_trait;
use axum::Router;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub async fn unused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn sample_analytics() -> AnalyticsData {
    AnalyticsData {
        active_users: Some(16800),
        total_revenue: Some(24000.0),
        revenue_growth: Some(17.3),
        community_growth: Some(65.0),
        screen_time: Some(5.7),
        total_mentors: Some(2025),
        monthly_revenue: vec![
            RevenuePoint::new("Jan", 4000.0),
            RevenuePoint::new("Feb", 3500.0),
            RevenuePoint::new("Mar", 4800.0),
        ],
        bills_topup: vec![Bill {
            name: "Cloud".to_string(),
            amount: 312.0,
            due: "Oct 26".to_string(),
        }],
    }
}

pub fn sample_workflows() -> WorkflowsData {
    WorkflowsData {
        total_executions: Some(100),
        workflows: vec![WorkflowStat::new("A", 100.0, 50), WorkflowStat::new("B", 90.0, 50)],
        recent_activity: vec![ActivityEvent {
            workflow: "A".to_string(),
            status: "success".to_string(),
            timestamp: "2 mins ago".to_string(),
        }],
    }
}

pub fn sample_projects() -> ProjectsData {
    ProjectsData {
        ongoing_projects: Some(68.5),
        compared_to_last_week: Some("+2.3%".to_string()),
        projects: vec![Project {
            name: "Design Refresh".to_string(),
            team: ["alice", "nora"].into_iter().map(String::from).collect(),
            status: ProjectStatus::InProgress,
        }],
    }
}

pub fn sample_health() -> HealthData {
    HealthData {
        status: HealthStatus::Healthy,
        ollama: "connected".to_string(),
        timestamp: Some("2025-10-20T08:15:00Z".to_string()),
    }
}

/// In-memory `DashboardSource` with canned results and optional per-source delays.
pub struct ScriptedSource {
    pub analytics: SourceResult<AnalyticsData>,
    pub workflows: SourceResult<WorkflowsData>,
    pub projects: SourceResult<ProjectsData>,
    pub health: SourceResult<HealthData>,
    delays: HashMap<SourceKind, Duration>,
    // Consumed one per refresh, applied to the health fetch.
    health_delays: Mutex<VecDeque<Duration>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn healthy() -> Self {
        Self {
            analytics: SourceResult::Success(sample_analytics()),
            workflows: SourceResult::Success(sample_workflows()),
            projects: SourceResult::Success(sample_projects()),
            health: SourceResult::Success(sample_health()),
            delays: HashMap::new(),
            health_delays: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn offline() -> Self {
        let down = || UnavailableReason::NetworkUnavailable("connection refused".to_string());
        Self {
            analytics: SourceResult::Unavailable(down()),
            workflows: SourceResult::Unavailable(down()),
            projects: SourceResult::Unavailable(down()),
            health: SourceResult::Unavailable(down()),
            ..Self::healthy()
        }
    }

    pub fn with_delay(mut self, kind: SourceKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }

    pub fn with_health_delays(self, delays: Vec<Duration>) -> Self {
        *self.health_delays.lock().unwrap() = delays.into();
        self
    }

    /// Number of completed fetch rounds, counted on the health fetch.
    pub fn refresh_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn wait(&self, kind: SourceKind) {
        let scripted = if kind == SourceKind::Health {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.health_delays.lock().unwrap().pop_front()
        } else {
            None
        };
        if let Some(delay) = scripted.or_else(|| self.delays.get(&kind).copied()) {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl DashboardSource for ScriptedSource {
    async fn fetch_health(&self) -> SourceResult<HealthData> {
        self.wait(SourceKind::Health).await;
        self.health.clone()
    }

    async fn fetch_analytics(&self) -> SourceResult<AnalyticsData> {
        self.wait(SourceKind::Analytics).await;
        self.analytics.clone()
    }

    async fn fetch_workflows(&self) -> SourceResult<WorkflowsData> {
        self.wait(SourceKind::Workflows).await;
        self.workflows.clone()
    }

    async fn fetch_projects(&self) -> SourceResult<ProjectsData> {
        self.wait(SourceKind::Projects).await;
        self.projects.clone()
    }
}
