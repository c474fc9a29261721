// Source payload domain models - shapes returned by the dashboard backend
use super::source_result::SourceKind;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// A payload fetched from one dashboard source.
pub trait SourcePayload: DeserializeOwned + Send + 'static {
    const KIND: SourceKind;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyticsData {
    pub active_users: Option<u64>,
    pub total_revenue: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_percentage")]
    pub revenue_growth: Option<f64>,
    pub community_growth: Option<f64>,
    /// Hours per day.
    pub screen_time: Option<f64>,
    pub total_mentors: Option<u64>,
    #[serde(default)]
    pub monthly_revenue: Vec<RevenuePoint>,
    #[serde(default)]
    pub bills_topup: Vec<Bill>,
}

impl SourcePayload for AnalyticsData {
    const KIND: SourceKind = SourceKind::Analytics;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub month: String,
    pub value: f64,
}

impl RevenuePoint {
    pub fn new(month: &str, value: f64) -> Self {
        Self {
            month: month.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub name: String,
    pub amount: f64,
    pub due: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowsData {
    pub total_executions: Option<u64>,
    #[serde(default)]
    pub workflows: Vec<WorkflowStat>,
    #[serde(default)]
    pub recent_activity: Vec<ActivityEvent>,
}

impl WorkflowsData {
    /// Reported total, or the sum over individual workflows when the backend omits it.
    /// Summed as `u128` so no combination of `u64` counts can overflow.
    pub fn executions(&self) -> u128 {
        match self.total_executions {
            Some(total) => u128::from(total),
            None => total_executions(&self.workflows),
        }
    }
}

impl SourcePayload for WorkflowsData {
    const KIND: SourceKind = SourceKind::Workflows;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStat {
    pub name: String,
    /// Percentage in 0..=100; absent when the backend did not report one.
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub executions: u64,
}

impl WorkflowStat {
    pub fn new(name: &str, success_rate: f64, executions: u64) -> Self {
        Self {
            name: name.to_string(),
            success_rate: Some(success_rate),
            executions,
        }
    }
}

pub fn total_executions(workflows: &[WorkflowStat]) -> u128 {
    workflows.iter().map(|w| u128::from(w.executions)).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub workflow: String,
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectsData {
    pub ongoing_projects: Option<f64>,
    pub compared_to_last_week: Option<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl SourcePayload for ProjectsData {
    const KIND: SourceKind = SourceKind::Projects;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub team: BTreeSet<String>,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    InProgress,
    Completed,
    Review,
    #[serde(other)]
    Other,
}

impl ProjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::InProgress => "in progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Review => "review",
            ProjectStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthData {
    pub status: HealthStatus,
    #[serde(default)]
    pub ollama: String,
    /// ISO-8601, as sent by the backend.
    pub timestamp: Option<String>,
}

impl SourcePayload for HealthData {
    const KIND: SourceKind = SourceKind::Health;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    #[serde(alias = "unhealthy")]
    Offline,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Offline => "offline",
        }
    }
}

/// Parse a percentage such as `"+17.3%"`, `"-2%"` or `"4.5"`.
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_end_matches('%').trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    unsigned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn deserialize_percentage<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => parse_percentage(&text)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid percentage: {}", text))),
    }
}
