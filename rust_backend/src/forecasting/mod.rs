//! Demand forecasting: model, evaluation, and series selection.

pub mod design;
pub mod evaluation;
pub mod future;
pub mod model;

pub use evaluation::{evaluate, EvaluationReport};
pub use model::{DemandForecaster, FeatureRow, FittedModel};

use std::collections::BTreeMap;

use crate::core::domain::HourlyDemandObservation;
use crate::core::error::{ForecastError, ForecastResult};

/// The restaurant with the most observations in the demand table.
///
/// Ties resolve to the lowest restaurant id.
pub fn busiest_restaurant(rows: &[HourlyDemandObservation]) -> ForecastResult<u32> {
    if rows.is_empty() {
        return Err(ForecastError::EmptySeries(
            "demand table has no observations".to_string(),
        ));
    }

    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.restaurant_id).or_insert(0) += 1;
    }

    let (id, _) = counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .expect("counts is non-empty");
    Ok(id)
}

/// One restaurant's observations, sorted by hour ascending.
pub fn restaurant_series(
    rows: &[HourlyDemandObservation],
    restaurant_id: u32,
) -> ForecastResult<Vec<HourlyDemandObservation>> {
    let mut series: Vec<HourlyDemandObservation> = rows
        .iter()
        .filter(|r| r.restaurant_id == restaurant_id)
        .cloned()
        .collect();

    if series.is_empty() {
        return Err(ForecastError::EmptySeries(format!(
            "restaurant {} has no historical observations",
            restaurant_id
        )));
    }

    series.sort_by_key(|r| r.hour_timestamp);
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn obs(restaurant_id: u32, hour_offset: i64) -> HourlyDemandObservation {
        let ts = NaiveDate::from_ymd_opt(2022, 4, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::hours(hour_offset);
        HourlyDemandObservation::new(ts, restaurant_id, 10, false, 0.0)
    }

    #[test]
    fn busiest_restaurant_is_the_mode() {
        let rows = vec![obs(1, 0), obs(2, 0), obs(2, 1), obs(3, 0), obs(2, 2)];
        assert_eq!(busiest_restaurant(&rows).unwrap(), 2);
    }

    #[test]
    fn busiest_restaurant_ties_resolve_to_lowest_id() {
        let rows = vec![obs(5, 0), obs(3, 0), obs(5, 1), obs(3, 1)];
        assert_eq!(busiest_restaurant(&rows).unwrap(), 3);
    }

    #[test]
    fn empty_table_has_no_busiest_restaurant() {
        assert!(matches!(
            busiest_restaurant(&[]),
            Err(ForecastError::EmptySeries(_))
        ));
    }

    #[test]
    fn series_is_filtered_and_sorted() {
        let rows = vec![obs(1, 5), obs(2, 0), obs(1, 2), obs(1, 9)];
        let series = restaurant_series(&rows, 1).unwrap();
        assert_eq!(series.len(), 3);
        assert!(series.windows(2).all(|w| w[0].hour_timestamp < w[1].hour_timestamp));
    }

    #[test]
    fn unknown_restaurant_is_an_empty_series_error() {
        let rows = vec![obs(1, 0)];
        assert!(matches!(
            restaurant_series(&rows, 99),
            Err(ForecastError::EmptySeries(_))
        ));
    }
}
