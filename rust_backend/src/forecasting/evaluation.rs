//! Offline evaluation of the demand forecaster.
//!
//! The most recent days of history are held out as a test window; the model
//! fits on everything earlier and is scored on the holdout. This mirrors how
//! staffing accuracy would be reviewed in operations; it is not part of the
//! online forecast path.

use chrono::Duration;
use log::info;
use serde::{Deserialize, Serialize};

use crate::core::domain::HourlyDemandObservation;
use crate::core::error::{ForecastError, ForecastResult};
use crate::forecasting::model::{DemandForecaster, FeatureRow};

/// Accuracy report for a holdout evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Mean absolute percentage error on the holdout window.
    pub mape: f64,
    /// 1 − MAPE, as a fraction.
    pub accuracy: f64,
    /// Industry baseline error rate the model is compared against.
    pub baseline_mape: f64,
    /// Relative improvement over the baseline, in percent.
    pub improvement_pct: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Fit on all but the last `holdout_days` days and score on the rest.
///
/// Actual order counts are floored at 1 in the MAPE denominator so empty
/// hours cannot divide by zero.
pub fn evaluate(
    forecaster: &DemandForecaster,
    history: &[HourlyDemandObservation],
    holdout_days: i64,
    baseline_mape: f64,
) -> ForecastResult<EvaluationReport> {
    if history.is_empty() {
        return Err(ForecastError::EmptySeries(
            "evaluation requires historical observations".to_string(),
        ));
    }

    let mut obs: Vec<&HourlyDemandObservation> = history.iter().collect();
    obs.sort_by_key(|o| o.hour_timestamp);

    let cutoff = obs[obs.len() - 1].hour_timestamp - Duration::days(holdout_days);
    let split = obs.partition_point(|o| o.hour_timestamp <= cutoff);
    let (train, test) = obs.split_at(split);

    if train.is_empty() {
        return Err(ForecastError::Data(format!(
            "holdout window of {} days covers the entire history",
            holdout_days
        )));
    }
    if test.is_empty() {
        return Err(ForecastError::Data(
            "holdout window contains no observations".to_string(),
        ));
    }

    let train_owned: Vec<HourlyDemandObservation> = train.iter().map(|o| (*o).clone()).collect();
    let model = forecaster.fit(&train_owned)?;

    let future: Vec<FeatureRow> = test.iter().map(|o| FeatureRow::from_observation(o)).collect();
    let points = forecaster.predict(&model, future.len(), &future)?;

    let mape = test
        .iter()
        .zip(&points)
        .map(|(actual, predicted)| {
            let a = actual.order_count as f64;
            (a - predicted.predicted_orders as f64).abs() / a.max(1.0)
        })
        .sum::<f64>()
        / test.len() as f64;

    let report = EvaluationReport {
        mape,
        accuracy: 1.0 - mape,
        baseline_mape,
        improvement_pct: (baseline_mape - mape) / baseline_mape * 100.0,
        train_rows: train.len(),
        test_rows: test.len(),
    };

    info!(
        "Holdout evaluation: accuracy {:.1}%, {:.1}% better than baseline",
        report.accuracy * 100.0,
        report.improvement_pct
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn history(days: usize, count: u32) -> Vec<HourlyDemandObservation> {
        let start = NaiveDate::from_ymd_opt(2022, 2, 7)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..days * 24)
            .map(|i| {
                let ts = start + Duration::hours(i as i64);
                let mut obs = HourlyDemandObservation::new(ts, 1, count, false, 0.0);
                obs.orders_last_hour = Some(count as f64);
                obs.orders_last_day_same_hour = Some(count as f64);
                obs.orders_3h_mean = Some(count as f64);
                obs
            })
            .collect()
    }

    #[test]
    fn splits_the_last_week_as_test() {
        let rows = history(21, 20);
        let report = evaluate(&DemandForecaster::new(), &rows, 7, 0.35).unwrap();
        // ts > (last − 7 days) leaves exactly 168 holdout hours
        assert_eq!(report.test_rows, 7 * 24);
        assert_eq!(report.train_rows, rows.len() - report.test_rows);
    }

    #[test]
    fn constant_series_scores_near_perfect() {
        let rows = history(21, 20);
        let report = evaluate(&DemandForecaster::new(), &rows, 7, 0.35).unwrap();
        assert!(report.mape < 0.15, "mape was {}", report.mape);
        assert!(report.accuracy > 0.85);
        assert!(report.improvement_pct > 0.0);
    }

    #[test]
    fn holdout_longer_than_history_is_an_error() {
        let rows = history(3, 20);
        assert!(matches!(
            evaluate(&DemandForecaster::new(), &rows, 7, 0.35),
            Err(ForecastError::Data(_))
        ));
    }

    #[test]
    fn empty_history_is_an_empty_series_error() {
        assert!(matches!(
            evaluate(&DemandForecaster::new(), &[], 7, 0.35),
            Err(ForecastError::EmptySeries(_))
        ));
    }
}
