// Derived metrics - pure projection of a snapshot into presentation-ready values
use crate::application::fallback::{Fallback, fallback_for};
use crate::domain::format::{
    NO_VALUE, format_currency, format_decimal, format_delta, format_number,
};
use crate::domain::snapshot::DashboardSnapshot;
use crate::domain::source_result::SourceResult;
use crate::domain::sources::{
    AnalyticsData, HealthData, HealthStatus, ProjectsData, RevenuePoint, WorkflowStat,
    WorkflowsData, total_executions,
};
use crate::domain::view::{
    ActivityLine, BillLine, DerivedView, MetricCard, MetricValue, ProjectDelivery, ProjectLine,
    ReliabilityBar, ShareSegment, StatusBadge, TrendPoint, WorkflowShare,
};
use crate::infrastructure::config::MetricsSettings;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::borrow::Cow;

pub const CONNECTING_PLACEHOLDER: &str =
    "Connecting to telemetry services… live insights will appear once the backend responds.";

const SEGMENT_COLORS: [&str; 4] = ["#38bdf8", "#6366f1", "#f97316", "#0ea5e9"];
const RECENT_ACTIVITY_LIMIT: usize = 5;
const AWAITING_SIGNAL: &str = "Awaiting signal";

/// Never fails: unavailable sources are replaced by their fallback dataset and
/// unusable values degrade to the "no value" marker.
pub fn compute(snapshot: &DashboardSnapshot, settings: &MetricsSettings) -> DerivedView {
    let analytics = resolve(&snapshot.analytics);
    let workflows = resolve(&snapshot.workflows);
    let projects = resolve(&snapshot.projects);

    let average_success_rate = average_success_rate(&workflows.workflows);
    let average_success_text: MetricValue = average_success_rate
        .and_then(format_decimal)
        .map(|avg| format!("{}% avg success", avg))
        .into();

    let stale_sources = snapshot.unavailable_sources();
    let advisory = if stale_sources.is_empty() {
        None
    } else {
        let names: Vec<&str> = stale_sources.iter().map(|k| k.name()).collect();
        Some(format!(
            "Unable to reach the backend; showing fallback data for {}.",
            names.join(", ")
        ))
    };

    DerivedView {
        sequence: snapshot.sequence,
        metric_cards: metric_cards(&analytics, &workflows),
        workflow_share: workflow_share(&workflows.workflows),
        workflow_reliability: workflow_reliability(&workflows.workflows),
        average_success_rate,
        average_success_text,
        live_summary_text: live_summary(&snapshot.analytics, &snapshot.workflows),
        revenue_trend: revenue_trend(&analytics.monthly_revenue, settings.rolling_window),
        status_badge: status_badge(&snapshot.health, &analytics),
        project_delivery: project_delivery(&projects),
        upcoming_bills: analytics
            .bills_topup
            .iter()
            .map(|bill| BillLine {
                name: bill.name.clone(),
                amount: formatted("bill amount", Some(bill.amount), format_currency),
                due: bill.due.clone(),
            })
            .collect(),
        recent_activity: workflows
            .recent_activity
            .iter()
            .take(RECENT_ACTIVITY_LIMIT)
            .map(|event| ActivityLine {
                workflow: event.workflow.clone(),
                status: event.status.clone(),
                timestamp: event.timestamp.clone(),
            })
            .collect(),
        stale_sources,
        advisory,
    }
}

fn resolve<T: Fallback + Clone>(result: &SourceResult<T>) -> Cow<'_, T> {
    match result {
        SourceResult::Success(value) => Cow::Borrowed(value),
        SourceResult::Unavailable(_) => Cow::Owned(fallback_for::<T>()),
    }
}

/// Unweighted mean over the workflows that reported a rate; `None` when none did.
pub fn average_success_rate(workflows: &[WorkflowStat]) -> Option<f64> {
    let rates: Vec<f64> = workflows.iter().filter_map(|w| w.success_rate).collect();
    if rates.len() < workflows.len() {
        tracing::debug!(
            "{} workflow(s) without a success rate left out of the average",
            workflows.len() - rates.len()
        );
    }
    if rates.is_empty() {
        return None;
    }
    Some(rates.iter().sum::<f64>() / rates.len() as f64)
}

/// Per-workflow success rates in list order; missing rates stay missing.
pub fn workflow_reliability(workflows: &[WorkflowStat]) -> Vec<ReliabilityBar> {
    workflows
        .iter()
        .map(|workflow| ReliabilityBar {
            label: workflow.name.clone(),
            success_rate: workflow.success_rate,
        })
        .collect()
}

/// Contiguous ring segments proportional to executions, in list order.
pub fn workflow_share(workflows: &[WorkflowStat]) -> WorkflowShare {
    let total = total_executions(workflows);
    if total == 0 {
        return WorkflowShare::NoData;
    }

    let mut accumulated = 0u128;
    let segments = workflows
        .iter()
        .enumerate()
        .map(|(index, workflow)| {
            let start_pct = accumulated as f64 / total as f64 * 100.0;
            accumulated += u128::from(workflow.executions);
            let end_pct = accumulated as f64 / total as f64 * 100.0;
            ShareSegment {
                label: workflow.name.clone(),
                color: SEGMENT_COLORS[index % SEGMENT_COLORS.len()],
                start_pct,
                end_pct,
            }
        })
        .collect();

    WorkflowShare::Segments(segments)
}

fn live_summary(
    analytics: &SourceResult<AnalyticsData>,
    workflows: &SourceResult<WorkflowsData>,
) -> String {
    match (analytics.success(), workflows.success()) {
        (Some(analytics), Some(workflows)) => format!(
            "Monitoring {} automation cycles and {} active accounts over the last 24 hours.",
            format_number(workflows.executions()),
            analytics
                .active_users
                .map(format_number)
                .unwrap_or_else(|| NO_VALUE.to_string())
        ),
        _ => CONNECTING_PLACEHOLDER.to_string(),
    }
}

fn metric_cards(analytics: &AnalyticsData, workflows: &WorkflowsData) -> Vec<MetricCard> {
    let flows = workflows.workflows.len();
    vec![
        MetricCard::new(
            "Automations Run",
            MetricValue::Value(format_number(workflows.executions())),
            MetricValue::Value(format!(
                "across {} workflow{}",
                flows,
                if flows == 1 { "" } else { "s" }
            )),
        ),
        MetricCard::new(
            "Active Accounts",
            analytics.active_users.map(format_number).into(),
            formatted("community growth", analytics.community_growth, |g| {
                format_decimal(g).map(|g| format!("{}% community growth", g))
            }),
        ),
        MetricCard::new(
            "Revenue Run-Rate",
            formatted("total revenue", analytics.total_revenue, format_currency),
            formatted("revenue growth", analytics.revenue_growth, format_delta),
        ),
        MetricCard::new(
            "Avg Screen Time",
            formatted("screen time", analytics.screen_time, |h| {
                format_decimal(h).map(|h| format!("{} h", h))
            }),
            MetricValue::Value("Daily engagement".to_string()),
        ),
    ]
}

fn formatted(
    field: &str,
    value: Option<f64>,
    format: impl Fn(f64) -> Option<String>,
) -> MetricValue {
    let Some(raw) = value else {
        return MetricValue::NoValue;
    };
    match format(raw) {
        Some(text) => MetricValue::Value(text),
        None => {
            tracing::debug!("Unrenderable {} value: {}", field, raw);
            MetricValue::NoValue
        }
    }
}

/// Trailing mean over at most `window` points, shorter at the start of the series.
pub fn revenue_trend(points: &[RevenuePoint], window: usize) -> Vec<TrendPoint> {
    let window = window.max(1);
    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let from = (index + 1).saturating_sub(window);
            let span = &points[from..=index];
            let rolling_average = span.iter().map(|p| p.value).sum::<f64>() / span.len() as f64;
            TrendPoint {
                month: point.month.clone(),
                value: point.value,
                rolling_average,
            }
        })
        .collect()
}

fn status_badge(health: &SourceResult<HealthData>, analytics: &AnalyticsData) -> StatusBadge {
    let resolved = resolve(health);
    let status = match health {
        SourceResult::Success(data) => data.status.label().to_string(),
        SourceResult::Unavailable(_) => "syncing".to_string(),
    };
    let telemetry_label = if health.is_success() && resolved.status == HealthStatus::Healthy {
        "Nominal"
    } else {
        "Investigate"
    };
    let last_sync = match resolved.timestamp.as_deref() {
        None => AWAITING_SIGNAL.to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => {
                tracing::debug!("Unparseable health timestamp: {}", raw);
                NO_VALUE.to_string()
            }
        },
    };

    StatusBadge {
        status,
        ollama_online: resolved.ollama == "connected",
        telemetry_label: telemetry_label.to_string(),
        last_sync,
        model_capacity: analytics
            .total_mentors
            .map(|n| format!("{} advisors", format_number(n)))
            .into(),
    }
}

/// RFC 3339, or a naive ISO-8601 timestamp taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn project_delivery(projects: &ProjectsData) -> ProjectDelivery {
    ProjectDelivery {
        on_track_text: formatted("ongoing projects", projects.ongoing_projects, |p| {
            format_decimal(p).map(|p| format!("{}% on track", p))
        }),
        compared_to_last_week: projects
            .compared_to_last_week
            .clone()
            .unwrap_or_else(|| "+0.0%".to_string()),
        projects: projects
            .projects
            .iter()
            .map(|project| ProjectLine {
                name: project.name.clone(),
                team: project.team.iter().cloned().collect::<Vec<_>>().join(", "),
                status: project.status.label().to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::source_result::{SourceKind, UnavailableReason};
    use crate::test_support::{
        sample_analytics, sample_health, sample_projects, sample_workflows,
    };

    fn view_of(snapshot: &DashboardSnapshot) -> DerivedView {
        compute(snapshot, &MetricsSettings::default())
    }

    fn segments(share: &WorkflowShare) -> &[ShareSegment] {
        match share {
            WorkflowShare::Segments(segments) => segments,
            WorkflowShare::NoData => &[],
        }
    }

    fn healthy_snapshot() -> DashboardSnapshot {
        DashboardSnapshot {
            analytics: SourceResult::Success(sample_analytics()),
            workflows: SourceResult::Success(sample_workflows()),
            projects: SourceResult::Success(sample_projects()),
            health: SourceResult::Success(sample_health()),
            sequence: 3,
            ..DashboardSnapshot::pending()
        }
    }

    fn down() -> UnavailableReason {
        UnavailableReason::NetworkUnavailable("connection refused".to_string())
    }

    fn assert_contiguous(share: &WorkflowShare) {
        let segments = segments(share);
        assert!((segments[0].start_pct - 0.0).abs() < 1e-9);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end_pct, pair[1].start_pct);
        }
        for segment in segments {
            assert!(segment.end_pct >= segment.start_pct);
        }
        let last = segments.last().unwrap();
        assert!((last.end_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_equal_workflows() {
        let view = view_of(&healthy_snapshot());

        assert_eq!(view.average_success_rate, Some(95.0));
        let segments = segments(&view.workflow_share);
        assert_eq!(segments.len(), 2);
        let arcs: Vec<(&str, f64, f64)> = segments
            .iter()
            .map(|s| (s.label.as_str(), s.start_pct, s.end_pct))
            .collect();
        assert_eq!(arcs, vec![("A", 0.0, 50.0), ("B", 50.0, 100.0)]);
        assert_eq!(view.average_success_text.as_str(), "95% avg success");
    }

    #[test]
    fn test_share_segments_are_contiguous_for_varied_inputs() {
        // Deterministic LCG inputs.
        let mut seed: u64 = 0x2545_f491;
        for round in 0..200 {
            let len = 1 + round % 9;
            let workflows: Vec<WorkflowStat> = (0..len)
                .map(|i| {
                    seed = seed
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    let spread = (seed >> 40) % 500;
                    let executions = if i == 0 { 1 + spread } else { spread };
                    WorkflowStat::new(&format!("w{}", i), 90.0, executions)
                })
                .collect();

            let share = workflow_share(&workflows);
            assert_eq!(segments(&share).len(), len as usize);
            assert_contiguous(&share);
        }
    }

    #[test]
    fn test_zero_executions_is_no_data() {
        let workflows = vec![WorkflowStat::new("A", 100.0, 0), WorkflowStat::new("B", 0.0, 0)];
        assert_eq!(workflow_share(&workflows), WorkflowShare::NoData);
        assert_eq!(workflow_share(&[]), WorkflowShare::NoData);

        // Zero-rate workflows still count towards the mean.
        assert_eq!(average_success_rate(&workflows), Some(50.0));
    }

    #[test]
    fn test_huge_execution_counts_do_not_overflow() {
        let half = u64::MAX / 2 + 1;
        let workflows: WorkflowsData = serde_json::from_value(serde_json::json!({
            "workflows": [
                {"name": "A", "success_rate": 99.0, "executions": half},
                {"name": "B", "success_rate": 97.0, "executions": half}
            ]
        }))
        .unwrap();

        let share = workflow_share(&workflows.workflows);
        let arcs: Vec<(f64, f64)> = segments(&share)
            .iter()
            .map(|s| (s.start_pct, s.end_pct))
            .collect();
        assert_eq!(arcs, vec![(0.0, 50.0), (50.0, 100.0)]);

        let mut snapshot = healthy_snapshot();
        snapshot.workflows = SourceResult::Success(workflows);
        let view = view_of(&snapshot);
        assert_eq!(view.metric_cards[0].value.as_str(), "18,446,744,073,709,551,616");
        assert!(view.live_summary_text.starts_with("Monitoring 18,446,744,073,709,551,616 "));
    }

    #[test]
    fn test_missing_success_rate_is_left_out_of_average() {
        let mut unrated = WorkflowStat::new("B", 0.0, 10);
        unrated.success_rate = None;
        let workflows = vec![WorkflowStat::new("A", 96.0, 10), unrated.clone()];

        assert_eq!(average_success_rate(&workflows), Some(96.0));
        assert_eq!(average_success_rate(&[unrated]), None);
    }

    #[test]
    fn test_workflow_reliability_follows_resolved_workflows() {
        let view = view_of(&healthy_snapshot());
        assert_eq!(
            view.workflow_reliability,
            vec![
                ReliabilityBar { label: "A".to_string(), success_rate: Some(100.0) },
                ReliabilityBar { label: "B".to_string(), success_rate: Some(90.0) },
            ]
        );

        let mut snapshot = healthy_snapshot();
        snapshot.workflows = SourceResult::Unavailable(down());
        let bars: Vec<(String, Option<f64>)> = view_of(&snapshot)
            .workflow_reliability
            .into_iter()
            .map(|bar| (bar.label, bar.success_rate))
            .collect();
        assert_eq!(
            bars,
            vec![
                ("Data Processing".to_string(), Some(98.7)),
                ("Risk Alerts".to_string(), Some(97.5)),
                ("Customer Support".to_string(), Some(96.2)),
            ]
        );
    }

    #[test]
    fn test_model_capacity_without_mentor_count() {
        let mut analytics = sample_analytics();
        analytics.total_mentors = None;
        let mut snapshot = healthy_snapshot();
        snapshot.analytics = SourceResult::Success(analytics);

        assert_eq!(view_of(&snapshot).status_badge.model_capacity, MetricValue::NoValue);
    }

    #[test]
    fn test_empty_workflow_list_has_undefined_average() {
        let mut snapshot = healthy_snapshot();
        snapshot.workflows = SourceResult::Success(WorkflowsData::default());

        let view = view_of(&snapshot);

        assert_eq!(view.average_success_rate, None);
        assert_eq!(view.average_success_text, MetricValue::NoValue);
        assert_eq!(view.workflow_share, WorkflowShare::NoData);
    }

    #[test]
    fn test_unavailable_workflows_use_fallback() {
        let mut snapshot = healthy_snapshot();
        snapshot.workflows = SourceResult::Unavailable(UnavailableReason::Timeout);

        let view = view_of(&snapshot);
        let fallback = fallback_for::<WorkflowsData>();

        assert_eq!(view.average_success_rate, average_success_rate(&fallback.workflows));
        let labels: Vec<&str> = segments(&view.workflow_share)
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Data Processing", "Risk Alerts", "Customer Support"]);
        assert_contiguous(&view.workflow_share);
        assert_eq!(view.stale_sources, vec![SourceKind::Workflows]);
        assert!(view.advisory.as_deref().unwrap().contains("workflows"));
    }

    #[test]
    fn test_live_summary_requires_analytics_and_workflows() {
        let mut snapshot = healthy_snapshot();
        assert_eq!(
            view_of(&snapshot).live_summary_text,
            "Monitoring 100 automation cycles and 16,800 active accounts over the last 24 hours."
        );

        snapshot.analytics = SourceResult::Unavailable(down());
        assert_eq!(view_of(&snapshot).live_summary_text, CONNECTING_PLACEHOLDER);

        let mut snapshot = healthy_snapshot();
        snapshot.workflows = SourceResult::Unavailable(UnavailableReason::Pending);
        assert_eq!(view_of(&snapshot).live_summary_text, CONNECTING_PLACEHOLDER);
    }

    #[test]
    fn test_all_sources_unavailable_renders_fallback_view() {
        let snapshot = DashboardSnapshot {
            analytics: SourceResult::Unavailable(down()),
            workflows: SourceResult::Unavailable(down()),
            projects: SourceResult::Unavailable(down()),
            health: SourceResult::Unavailable(down()),
            ..DashboardSnapshot::pending()
        };

        let view = view_of(&snapshot);

        assert_eq!(view.stale_sources.len(), 4);
        assert!(view.advisory.is_some());
        assert_eq!(view.live_summary_text, CONNECTING_PLACEHOLDER);
        assert_eq!(view.metric_cards[0].value.as_str(), "272");
        assert_eq!(view.metric_cards[1].value, MetricValue::NoValue);
        assert_eq!(view.metric_cards[2].value, MetricValue::NoValue);
        assert_eq!(view.metric_cards[3].value, MetricValue::NoValue);
        assert_eq!(view.revenue_trend.len(), 6);
        assert!(view.upcoming_bills.is_empty());
        assert_eq!(view.status_badge.status, "syncing");
        assert_eq!(view.status_badge.last_sync, "Awaiting signal");
        assert_eq!(view.status_badge.model_capacity, MetricValue::NoValue);
        assert!(!view.status_badge.ollama_online);
        assert_eq!(view.project_delivery.on_track_text, MetricValue::NoValue);
        assert_eq!(view.project_delivery.compared_to_last_week, "+0.0%");
    }

    #[test]
    fn test_compute_is_idempotent() {
        let snapshot = healthy_snapshot();
        assert_eq!(view_of(&snapshot), view_of(&snapshot));

        let pending = DashboardSnapshot::pending();
        assert_eq!(view_of(&pending), view_of(&pending));
    }

    #[test]
    fn test_metric_cards_formatting() {
        let view = view_of(&healthy_snapshot());
        let cards: Vec<(&str, &str, &str)> = view
            .metric_cards
            .iter()
            .map(|c| (c.label.as_str(), c.value.as_str(), c.change_text.as_str()))
            .collect();

        assert_eq!(
            cards,
            vec![
                ("Automations Run", "100", "across 2 workflows"),
                ("Active Accounts", "16,800", "65% community growth"),
                ("Revenue Run-Rate", "$24,000", "+17.3%"),
                ("Avg Screen Time", "5.7 h", "Daily engagement"),
            ]
        );
    }

    #[test]
    fn test_missing_or_non_finite_values_render_no_value() {
        let mut analytics = sample_analytics();
        analytics.active_users = None;
        analytics.total_revenue = Some(f64::NAN);
        analytics.revenue_growth = None;
        let mut snapshot = healthy_snapshot();
        snapshot.analytics = SourceResult::Success(analytics);

        let view = view_of(&snapshot);

        assert_eq!(view.metric_cards[1].value, MetricValue::NoValue);
        assert_eq!(view.metric_cards[2].value, MetricValue::NoValue);
        assert_eq!(view.metric_cards[2].change_text, MetricValue::NoValue);
        assert_eq!(
            view.live_summary_text,
            "Monitoring 100 automation cycles and — active accounts over the last 24 hours."
        );
    }

    #[test]
    fn test_revenue_rolling_average() {
        let points = vec![
            RevenuePoint::new("Jan", 3000.0),
            RevenuePoint::new("Feb", 6000.0),
            RevenuePoint::new("Mar", 9000.0),
            RevenuePoint::new("Apr", 3000.0),
        ];

        let averages: Vec<f64> =
            revenue_trend(&points, 3).iter().map(|p| p.rolling_average).collect();
        assert_eq!(averages, vec![3000.0, 4500.0, 6000.0, 6000.0]);

        // A zero window behaves like a window of one.
        let raw: Vec<f64> = revenue_trend(&points, 0).iter().map(|p| p.rolling_average).collect();
        assert_eq!(raw, vec![3000.0, 6000.0, 9000.0, 3000.0]);
    }

    #[test]
    fn test_status_badge() {
        let view = view_of(&healthy_snapshot());
        assert_eq!(view.status_badge.status, "healthy");
        assert_eq!(view.status_badge.telemetry_label, "Nominal");
        assert!(view.status_badge.ollama_online);
        assert_eq!(view.status_badge.last_sync, "2025-10-20 08:15:00 UTC");

        let mut snapshot = healthy_snapshot();
        snapshot.health = SourceResult::Success(HealthData {
            status: HealthStatus::Degraded,
            ollama: "disconnected".to_string(),
            timestamp: Some("2025-10-20T08:15:00.123456".to_string()),
        });
        let badge = view_of(&snapshot).status_badge;
        assert_eq!(badge.status, "degraded");
        assert_eq!(badge.telemetry_label, "Investigate");
        assert!(!badge.ollama_online);
        assert_eq!(badge.last_sync, "2025-10-20 08:15:00 UTC");
        assert_eq!(badge.model_capacity.as_str(), "2,025 advisors");

        snapshot.health = SourceResult::Success(HealthData {
            timestamp: Some("yesterday".to_string()),
            ..sample_health()
        });
        assert_eq!(view_of(&snapshot).status_badge.last_sync, NO_VALUE);
    }

    #[test]
    fn test_project_delivery_and_lists() {
        let view = view_of(&healthy_snapshot());

        assert_eq!(view.project_delivery.on_track_text.as_str(), "68.5% on track");
        assert_eq!(view.project_delivery.compared_to_last_week, "+2.3%");
        assert_eq!(view.project_delivery.projects[0].team, "alice, nora");
        assert_eq!(view.project_delivery.projects[0].status, "in progress");
        assert_eq!(view.upcoming_bills[0].amount.as_str(), "$312");
        assert_eq!(view.recent_activity.len(), 1);
        assert_eq!(view.sequence, 3);
        assert!(view.advisory.is_none());
    }
}
