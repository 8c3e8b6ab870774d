//! Translation of demand forecasts into delivery-partner staffing.

use log::info;

use crate::core::config::StaffingSettings;
use crate::core::domain::{ForecastPoint, StaffingPlanEntry, StaffingSummary};

/// Maps forecast points to partner counts and aggregates business metrics.
pub struct StaffingTranslator {
    settings: StaffingSettings,
}

impl StaffingTranslator {
    /// Translator with the default ratios (0.6 partners per order staffed,
    /// 0.75 baseline, 150 per partner-hour).
    pub fn new() -> Self {
        Self {
            settings: StaffingSettings::default(),
        }
    }

    /// Translator with explicit ratio settings.
    pub fn with_settings(settings: StaffingSettings) -> Self {
        Self { settings }
    }

    /// Derive the hourly staffing plan from a forecast.
    ///
    /// Every hour gets at least one partner; a location always has baseline
    /// coverage even at zero predicted demand.
    pub fn to_staffing_plan(&self, forecast: &[ForecastPoint]) -> Vec<StaffingPlanEntry> {
        forecast
            .iter()
            .map(|point| {
                let partners =
                    (point.predicted_orders as f64 * self.settings.partner_ratio).floor() as u32;
                StaffingPlanEntry {
                    hour_timestamp: point.hour_timestamp,
                    predicted_orders: point.predicted_orders,
                    partners_needed: partners.max(1),
                    rush_period: point.rush_period,
                }
            })
            .collect()
    }

    /// Aggregate a staffing plan into business summary metrics.
    ///
    /// The baseline partner count represents an unoptimized staffing policy
    /// applied to the same total order volume.
    pub fn summarize(&self, plan: &[StaffingPlanEntry]) -> StaffingSummary {
        let total_orders: u64 = plan.iter().map(|e| e.predicted_orders as u64).sum();
        let total_partners: u64 = plan.iter().map(|e| e.partners_needed as u64).sum();

        let baseline_partners = total_orders as f64 * self.settings.baseline_ratio;
        let partners_saved = baseline_partners - total_partners as f64;
        let avg_partners = if plan.is_empty() {
            0.0
        } else {
            total_partners as f64 / plan.len() as f64
        };

        let summary = StaffingSummary {
            total_predicted_orders: total_orders,
            partners_saved: partners_saved.trunc() as i64,
            cost_savings: partners_saved * self.settings.cost_per_partner_hour,
            avg_partners_per_hour: (avg_partners * 10.0).round() / 10.0,
        };

        info!(
            "Staffing summary: {} orders, {} partners saved, avg {}/hour",
            summary.total_predicted_orders, summary.partners_saved, summary.avg_partners_per_hour
        );

        summary
    }
}

impl Default for StaffingTranslator {
    fn default() -> Self {
        Self::new()
    }
}
