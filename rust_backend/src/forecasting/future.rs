//! Future feature-row synthesis for forecast requests.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};
use std::collections::BTreeMap;

use crate::core::domain::{is_dinner_rush_hour, is_lunch_rush_hour};
use crate::forecasting::model::FeatureRow;
use crate::preprocessing::calendar::FestivalCalendar;

/// Build feature rows for the `horizon` hours following `last_hour`.
///
/// Calendar flags are derived from each hour; festival flags come from the
/// supplied calendar; weather defaults to the given impact (normally 0.0,
/// i.e. normal weather).
pub fn future_feature_rows(
    last_hour: NaiveDateTime,
    horizon: usize,
    calendar: &FestivalCalendar,
    weather_impact: f64,
) -> Vec<FeatureRow> {
    (1..=horizon as i64)
        .map(|offset| {
            let ts = last_hour + Duration::hours(offset);
            let hour = ts.hour();
            let weekend = matches!(ts.weekday(), Weekday::Sat | Weekday::Sun);

            let mut regressors = BTreeMap::new();
            regressors.insert("is_weekend".to_string(), weekend as u8 as f64);
            regressors.insert(
                "is_lunch_rush".to_string(),
                is_lunch_rush_hour(hour) as u8 as f64,
            );
            regressors.insert(
                "is_dinner_rush".to_string(),
                is_dinner_rush_hour(hour) as u8 as f64,
            );
            regressors.insert("weather_impact".to_string(), weather_impact);
            regressors.insert(
                "is_festival".to_string(),
                calendar.is_festival(ts) as u8 as f64,
            );

            FeatureRow::new(ts, regressors)
        })
        .collect()
}
