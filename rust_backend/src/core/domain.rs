//! Domain models for hourly restaurant demand and delivery staffing.
//!
//! This module provides the core data structures that flow through the
//! forecasting pipeline: raw order events, the hourly demand observations
//! derived from them, and the forecast/staffing records produced at the end.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Inclusive hour range of the lunch rush window.
pub const LUNCH_RUSH_HOURS: (u32, u32) = (12, 14);

/// Inclusive hour range of the dinner rush window.
pub const DINNER_RUSH_HOURS: (u32, u32) = (19, 22);

/// Names of the exogenous regressors consumed by the forecaster, in the
/// column order used when building the design matrix.
pub const REGRESSOR_NAMES: [&str; 5] = [
    "is_weekend",
    "is_lunch_rush",
    "is_dinner_rush",
    "weather_impact",
    "is_festival",
];

/// Floors a timestamp to the start of its hour.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use dsi_rust::core::domain::floor_to_hour;
///
/// let ts = NaiveDate::from_ymd_opt(2022, 3, 14)
///     .unwrap()
///     .and_hms_opt(13, 42, 7)
///     .unwrap();
/// assert_eq!(floor_to_hour(ts).to_string(), "2022-03-14 13:00:00");
/// ```
pub fn floor_to_hour(ts: NaiveDateTime) -> NaiveDateTime {
    // hour() is always within 0..24, so the construction cannot fail
    ts.date()
        .and_hms_opt(ts.hour(), 0, 0)
        .expect("hour is always in range")
}

/// Returns `true` if the given hour-of-day falls in the lunch rush window.
pub fn is_lunch_rush_hour(hour: u32) -> bool {
    (LUNCH_RUSH_HOURS.0..=LUNCH_RUSH_HOURS.1).contains(&hour)
}

/// Returns `true` if the given hour-of-day falls in the dinner rush window.
pub fn is_dinner_rush_hour(hour: u32) -> bool {
    (DINNER_RUSH_HOURS.0..=DINNER_RUSH_HOURS.1).contains(&hour)
}

/// A single raw order event as received from the external loader.
///
/// Events are immutable input records; the pipeline never mutates them and
/// aggregates them into [`HourlyDemandObservation`] rows.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use dsi_rust::core::domain::RawOrderEvent;
///
/// let event = RawOrderEvent {
///     timestamp: NaiveDate::from_ymd_opt(2022, 1, 1)
///         .unwrap()
///         .and_hms_opt(12, 30, 0)
///         .unwrap(),
///     restaurant_id: 7,
///     item_id: 42,
///     order_count: 3,
/// };
/// assert_eq!(event.hour_floor().to_string(), "2022-01-01 12:00:00");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrderEvent {
    pub timestamp: NaiveDateTime,
    pub restaurant_id: u32,
    pub item_id: u32,
    pub order_count: u32,
}

impl RawOrderEvent {
    /// Returns the event timestamp floored to the start of its hour.
    pub fn hour_floor(&self) -> NaiveDateTime {
        floor_to_hour(self.timestamp)
    }
}

/// Labeled time window used for staffing emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RushPeriod {
    Lunch,
    Dinner,
    Regular,
}

impl RushPeriod {
    /// Derives the rush label from the lunch/dinner flags alone.
    ///
    /// Lunch takes precedence over dinner. The windows are disjoint by
    /// construction, so the precedence is a defensive default rather than a
    /// reachable business rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use dsi_rust::core::domain::RushPeriod;
    ///
    /// assert_eq!(RushPeriod::from_flags(true, false), RushPeriod::Lunch);
    /// assert_eq!(RushPeriod::from_flags(false, true), RushPeriod::Dinner);
    /// assert_eq!(RushPeriod::from_flags(false, false), RushPeriod::Regular);
    /// ```
    pub fn from_flags(is_lunch_rush: bool, is_dinner_rush: bool) -> Self {
        if is_lunch_rush {
            RushPeriod::Lunch
        } else if is_dinner_rush {
            RushPeriod::Dinner
        } else {
            RushPeriod::Regular
        }
    }

    /// Human-readable label used in dashboard records.
    pub fn label(&self) -> &'static str {
        match self {
            RushPeriod::Lunch => "Lunch Rush",
            RushPeriod::Dinner => "Dinner Rush",
            RushPeriod::Regular => "Regular",
        }
    }
}

impl std::fmt::Display for RushPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One restaurant's aggregated order count and contextual flags for a single
/// hour.
///
/// Rows are unique per `(hour_timestamp, restaurant_id)` pair. The lag and
/// rolling fields are `None` until the feature pipeline computes and fills
/// them; the table handed to the forecaster never contains `None` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyDemandObservation {
    pub hour_timestamp: NaiveDateTime,
    pub restaurant_id: u32,
    pub order_count: u32,
    pub is_weekend: bool,
    pub is_lunch_rush: bool,
    pub is_dinner_rush: bool,
    pub is_festival: bool,
    pub weather_impact: f64,
    pub orders_last_hour: Option<f64>,
    pub orders_last_day_same_hour: Option<f64>,
    pub orders_3h_mean: Option<f64>,
}

impl HourlyDemandObservation {
    /// Creates an observation with calendar flags derived from the hour value
    /// and lag fields left unset.
    pub fn new(
        hour_timestamp: NaiveDateTime,
        restaurant_id: u32,
        order_count: u32,
        is_festival: bool,
        weather_impact: f64,
    ) -> Self {
        let hour = hour_timestamp.hour();
        let weekday = hour_timestamp.weekday();
        Self {
            hour_timestamp,
            restaurant_id,
            order_count,
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
            is_lunch_rush: is_lunch_rush_hour(hour),
            is_dinner_rush: is_dinner_rush_hour(hour),
            is_festival,
            weather_impact,
            orders_last_hour: None,
            orders_last_day_same_hour: None,
            orders_3h_mean: None,
        }
    }

    /// Rush label implied by this observation's flags.
    pub fn rush_period(&self) -> RushPeriod {
        RushPeriod::from_flags(self.is_lunch_rush, self.is_dinner_rush)
    }

    /// The exogenous regressor values in [`REGRESSOR_NAMES`] order.
    pub fn regressors(&self) -> [(&'static str, f64); 5] {
        [
            ("is_weekend", self.is_weekend as u8 as f64),
            ("is_lunch_rush", self.is_lunch_rush as u8 as f64),
            ("is_dinner_rush", self.is_dinner_rush as u8 as f64),
            ("weather_impact", self.weather_impact),
            ("is_festival", self.is_festival as u8 as f64),
        ]
    }

    /// `true` once every lag/rolling feature has a defined value.
    pub fn features_complete(&self) -> bool {
        self.orders_last_hour.is_some()
            && self.orders_last_day_same_hour.is_some()
            && self.orders_3h_mean.is_some()
    }
}

/// A single forecasted hour with interval bounds and rush label.
///
/// Produced by the forecaster; read-only downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub hour_timestamp: NaiveDateTime,
    pub predicted_orders: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub rush_period: RushPeriod,
}

/// Partner-count recommendation for a single forecasted hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingPlanEntry {
    pub hour_timestamp: NaiveDateTime,
    pub predicted_orders: u32,
    pub partners_needed: u32,
    pub rush_period: RushPeriod,
}

/// Pure aggregate over a staffing plan; recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingSummary {
    pub total_predicted_orders: u64,
    pub partners_saved: i64,
    pub cost_savings: f64,
    pub avg_partners_per_hour: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hour(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn rush_windows_are_disjoint() {
        for h in 0..24 {
            assert!(
                !(is_lunch_rush_hour(h) && is_dinner_rush_hour(h)),
                "hour {} is in both rush windows",
                h
            );
        }
    }

    #[test]
    fn rush_window_boundaries() {
        assert!(!is_lunch_rush_hour(11));
        assert!(is_lunch_rush_hour(12));
        assert!(is_lunch_rush_hour(14));
        assert!(!is_lunch_rush_hour(15));
        assert!(!is_dinner_rush_hour(18));
        assert!(is_dinner_rush_hour(19));
        assert!(is_dinner_rush_hour(22));
        assert!(!is_dinner_rush_hour(23));
    }

    #[test]
    fn observation_derives_flags_from_hour() {
        // 2022-01-01 is a Saturday
        let obs = HourlyDemandObservation::new(hour(2022, 1, 1, 13), 3, 25, false, 0.3);
        assert!(obs.is_weekend);
        assert!(obs.is_lunch_rush);
        assert!(!obs.is_dinner_rush);
        assert_eq!(obs.rush_period(), RushPeriod::Lunch);
        assert!(!obs.features_complete());

        // 2022-01-03 is a Monday
        let obs = HourlyDemandObservation::new(hour(2022, 1, 3, 20), 3, 25, false, 0.0);
        assert!(!obs.is_weekend);
        assert_eq!(obs.rush_period(), RushPeriod::Dinner);
    }

    #[test]
    fn regressor_order_matches_names() {
        let obs = HourlyDemandObservation::new(hour(2022, 1, 1, 13), 1, 10, true, 0.7);
        let regs = obs.regressors();
        for (i, (name, _)) in regs.iter().enumerate() {
            assert_eq!(*name, REGRESSOR_NAMES[i]);
        }
        assert_eq!(regs[3].1, 0.7);
        assert_eq!(regs[4].1, 1.0);
    }

    #[test]
    fn event_hour_floor_truncates_minutes() {
        let event = RawOrderEvent {
            timestamp: NaiveDate::from_ymd_opt(2022, 6, 15)
                .unwrap()
                .and_hms_opt(19, 59, 59)
                .unwrap(),
            restaurant_id: 1,
            item_id: 1,
            order_count: 1,
        };
        assert_eq!(event.hour_floor(), hour(2022, 6, 15, 19));
    }
}
