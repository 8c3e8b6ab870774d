//! Dashboard-facing Data Transfer Objects (DTOs).
//!
//! These types carry only flat primitives (String, f64, integer counts) so
//! the dashboard can consume them directly as JSON. Internal types with
//! chrono timestamps and enums are converted at this boundary and never
//! leak past it.

use serde::{Deserialize, Serialize};

/// One forecasted hour as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Hour formatted as "YYYY-MM-DD HH:00".
    pub hour: String,
    pub predicted_orders: u32,
    pub delivery_partners_needed: u32,
    /// Interval formatted as "lower-upper".
    pub confidence_interval: String,
    /// "Lunch Rush", "Dinner Rush", or "Regular".
    pub rush_period: String,
}

/// Business impact summary shown next to the forecast table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsImpact {
    pub total_predicted_orders: u64,
    pub delivery_partners_saved: i64,
    pub estimated_cost_savings: f64,
    pub avg_delivery_partners: f64,
}

/// Model quality summary from the offline evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyRecord {
    /// Forecast accuracy, in percent.
    pub accuracy_pct: f64,
    /// Improvement over the industry baseline, in percent.
    pub improvement_pct: f64,
}

/// Everything the dashboard needs for one forecast request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub forecast: Vec<ForecastRecord>,
    pub impact: LogisticsImpact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<AccuracyRecord>,
}
