//! Dashboard boundary: flat DTOs and conversions from internal models.

pub mod conversions;
pub mod types;

pub use conversions::{dashboard_payload, forecast_record, logistics_impact};
pub use types::{AccuracyRecord, DashboardPayload, ForecastRecord, LogisticsImpact};
