//! Design-matrix construction for the seasonal regression model.
//!
//! Each observation maps to one row: intercept and linear trend, hinge
//! features at the change points, Fourier harmonics for the daily and weekly
//! cycles, and the named exogenous regressors. Yearly seasonality is not
//! modeled; staffing horizons are short.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::core::error::{ForecastError, ForecastResult};
use crate::forecasting::model::FeatureRow;

pub const HOURS_PER_DAY: f64 = 24.0;
pub const HOURS_PER_WEEK: f64 = 168.0;

/// Layout of the model's design matrix. Serialized as part of the fitted
/// model so predictions rebuild identical rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSpec {
    /// Change-point locations in normalized trend time, ascending.
    pub changepoints: Vec<f64>,
    /// Number of Fourier harmonics for the daily cycle.
    pub daily_order: usize,
    /// Number of Fourier harmonics for the weekly cycle.
    pub weekly_order: usize,
    /// Names of the exogenous regressors, in design-column order.
    pub regressor_names: Vec<String>,
}

impl DesignSpec {
    /// Change points spread uniformly over the first 80% of the training
    /// span, where trend shifts can still be estimated from later data.
    pub fn uniform_changepoints(n: usize) -> Vec<f64> {
        (1..=n).map(|i| 0.8 * i as f64 / (n + 1) as f64).collect()
    }

    /// Total number of design columns.
    pub fn n_columns(&self) -> usize {
        2 + self.changepoints.len()
            + 2 * self.daily_order
            + 2 * self.weekly_order
            + self.regressor_names.len()
    }

    /// Range of column indices holding the change-point hinges.
    pub fn changepoint_columns(&self) -> std::ops::Range<usize> {
        2..2 + self.changepoints.len()
    }

    /// Build one design row.
    ///
    /// `t_hours` is time since the training origin in hours; `t_norm` is the
    /// same time normalized by the training span. `row_index` is used only
    /// for error reporting when a regressor is missing.
    pub fn row(
        &self,
        t_hours: f64,
        t_norm: f64,
        row_index: usize,
        features: &FeatureRow,
    ) -> ForecastResult<Vec<f64>> {
        let mut x = Vec::with_capacity(self.n_columns());
        x.push(1.0);
        x.push(t_norm);

        for s in &self.changepoints {
            x.push((t_norm - s).max(0.0));
        }

        for m in 1..=self.daily_order {
            let arg = 2.0 * PI * m as f64 * t_hours / HOURS_PER_DAY;
            x.push(arg.sin());
            x.push(arg.cos());
        }

        for m in 1..=self.weekly_order {
            let arg = 2.0 * PI * m as f64 * t_hours / HOURS_PER_WEEK;
            x.push(arg.sin());
            x.push(arg.cos());
        }

        for name in &self.regressor_names {
            let value = features.regressor(name).ok_or_else(|| {
                ForecastError::MissingRegressor {
                    name: name.clone(),
                    row: row_index,
                }
            })?;
            x.push(value);
        }

        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn feature_row(values: &[(&str, f64)]) -> FeatureRow {
        FeatureRow {
            hour_timestamp: NaiveDate::from_ymd_opt(2022, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            regressors: values
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn spec() -> DesignSpec {
        DesignSpec {
            changepoints: DesignSpec::uniform_changepoints(3),
            daily_order: 4,
            weekly_order: 3,
            regressor_names: vec!["is_weekend".to_string(), "weather_impact".to_string()],
        }
    }

    #[test]
    fn column_count_matches_layout() {
        let spec = spec();
        // 2 trend + 3 hinges + 8 daily + 6 weekly + 2 regressors
        assert_eq!(spec.n_columns(), 21);
        let row = spec
            .row(0.0, 0.0, 0, &feature_row(&[("is_weekend", 1.0), ("weather_impact", 0.3)]))
            .unwrap();
        assert_eq!(row.len(), 21);
    }

    #[test]
    fn changepoints_stay_in_first_80_percent() {
        let cps = DesignSpec::uniform_changepoints(10);
        assert_eq!(cps.len(), 10);
        assert!(cps.iter().all(|s| *s > 0.0 && *s < 0.8));
        assert!(cps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn hinge_is_zero_before_its_changepoint() {
        let spec = spec();
        let row = spec
            .row(0.0, 0.1, 0, &feature_row(&[("is_weekend", 0.0), ("weather_impact", 0.0)]))
            .unwrap();
        let hinges = &row[spec.changepoint_columns()];
        // first changepoint is at 0.2, so every hinge is still zero at 0.1
        assert!(hinges.iter().all(|h| *h == 0.0));
    }

    #[test]
    fn daily_harmonics_repeat_every_24_hours() {
        let spec = spec();
        let features = feature_row(&[("is_weekend", 0.0), ("weather_impact", 0.0)]);
        let a = spec.row(6.0, 0.1, 0, &features).unwrap();
        let b = spec.row(6.0 + 24.0 * 7.0, 0.1, 0, &features).unwrap();
        // daily and weekly harmonics line up again one week later
        for j in 2 + spec.changepoints.len()..spec.n_columns() - 2 {
            assert!((a[j] - b[j]).abs() < 1e-9, "column {} differs", j);
        }
    }

    #[test]
    fn missing_regressor_is_reported_with_row_index() {
        let spec = spec();
        let err = spec
            .row(0.0, 0.0, 5, &feature_row(&[("is_weekend", 1.0)]))
            .unwrap_err();
        match err {
            ForecastError::MissingRegressor { name, row } => {
                assert_eq!(name, "weather_impact");
                assert_eq!(row, 5);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
