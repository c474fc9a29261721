// Derived view domain model - presentation-ready projection of a snapshot
use super::format::NO_VALUE;
use super::source_result::SourceKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    /// Sequence of the snapshot this view was computed from.
    pub sequence: u64,
    pub metric_cards: Vec<MetricCard>,
    pub workflow_share: WorkflowShare,
    pub workflow_reliability: Vec<ReliabilityBar>,
    /// `None` when there are no workflows; distinct from a 0% average.
    pub average_success_rate: Option<f64>,
    pub average_success_text: MetricValue,
    pub live_summary_text: String,
    pub revenue_trend: Vec<TrendPoint>,
    pub status_badge: StatusBadge,
    pub project_delivery: ProjectDelivery,
    pub upcoming_bills: Vec<BillLine>,
    pub recent_activity: Vec<ActivityLine>,
    pub stale_sources: Vec<SourceKind>,
    pub advisory: Option<String>,
}

/// A formatted value, or the explicit marker for a value we do not have.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Value(String),
    NoValue,
}

impl MetricValue {
    pub fn as_str(&self) -> &str {
        match self {
            MetricValue::Value(text) => text,
            MetricValue::NoValue => NO_VALUE,
        }
    }
}

impl From<Option<String>> for MetricValue {
    fn from(value: Option<String>) -> Self {
        value.map(MetricValue::Value).unwrap_or(MetricValue::NoValue)
    }
}

impl Serialize for MetricValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: MetricValue,
    pub change_text: MetricValue,
}

impl MetricCard {
    pub fn new(label: &str, value: MetricValue, change_text: MetricValue) -> Self {
        Self {
            label: label.to_string(),
            value,
            change_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "segments", rename_all = "snake_case")]
pub enum WorkflowShare {
    Segments(Vec<ShareSegment>),
    NoData,
}

/// A `[start_pct, end_pct)` arc of the workflow ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareSegment {
    pub label: String,
    pub color: &'static str,
    pub start_pct: f64,
    pub end_pct: f64,
}

/// Success rate of one workflow; `None` is shown as a missing bar, not 0%.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReliabilityBar {
    pub label: String,
    pub success_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub value: f64,
    pub rolling_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBadge {
    pub status: String,
    pub ollama_online: bool,
    pub telemetry_label: String,
    pub last_sync: String,
    /// `"{n} advisors"` from analytics.
    pub model_capacity: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDelivery {
    pub on_track_text: MetricValue,
    pub compared_to_last_week: String,
    pub projects: Vec<ProjectLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectLine {
    pub name: String,
    pub team: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillLine {
    pub name: String,
    pub amount: MetricValue,
    pub due: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityLine {
    pub workflow: String,
    pub status: String,
    pub timestamp: String,
}
