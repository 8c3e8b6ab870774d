//! Conversions between internal models and dashboard DTOs.

use crate::api::types::{AccuracyRecord, DashboardPayload, ForecastRecord, LogisticsImpact};
use crate::core::domain::{ForecastPoint, StaffingPlanEntry, StaffingSummary};
use crate::forecasting::EvaluationReport;

/// Pair one forecast point with its staffing entry as a dashboard record.
///
/// Interval bounds are truncated to whole orders for the dashboard's
/// "lower-upper" rendering.
pub fn forecast_record(point: &ForecastPoint, entry: &StaffingPlanEntry) -> ForecastRecord {
    ForecastRecord {
        hour: point.hour_timestamp.format("%Y-%m-%d %H:00").to_string(),
        predicted_orders: point.predicted_orders,
        delivery_partners_needed: entry.partners_needed,
        confidence_interval: format!(
            "{}-{}",
            point.lower_bound.trunc() as i64,
            point.upper_bound.trunc() as i64
        ),
        rush_period: point.rush_period.label().to_string(),
    }
}

pub fn logistics_impact(summary: &StaffingSummary) -> LogisticsImpact {
    LogisticsImpact {
        total_predicted_orders: summary.total_predicted_orders,
        delivery_partners_saved: summary.partners_saved,
        estimated_cost_savings: summary.cost_savings,
        avg_delivery_partners: summary.avg_partners_per_hour,
    }
}

pub fn accuracy_record(report: &EvaluationReport) -> AccuracyRecord {
    AccuracyRecord {
        accuracy_pct: report.accuracy * 100.0,
        improvement_pct: report.improvement_pct,
    }
}

/// Assemble the full dashboard payload from the pipeline outputs.
pub fn dashboard_payload(
    forecast: &[ForecastPoint],
    plan: &[StaffingPlanEntry],
    summary: &StaffingSummary,
    evaluation: Option<&EvaluationReport>,
) -> DashboardPayload {
    DashboardPayload {
        forecast: forecast
            .iter()
            .zip(plan)
            .map(|(point, entry)| forecast_record(point, entry))
            .collect(),
        impact: logistics_impact(summary),
        accuracy: evaluation.map(accuracy_record),
    }
}
