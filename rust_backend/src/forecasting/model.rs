//! Seasonal regression forecaster with exogenous regressors.
//!
//! The model decomposes hourly demand into a piecewise-linear trend, daily
//! and weekly Fourier seasonality, and a linear contribution from the named
//! regressors. Seasonality is multiplicative: the fit runs in log1p space,
//! so seasonal and regressor effects scale with the baseline level instead
//! of adding a constant. The fit solves ridge-regularized normal equations;
//! the penalty on the change-point deltas is the inverse of the change-point
//! sensitivity, so low sensitivities give smoother trends.

use chrono::NaiveDateTime;
use log::info;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::config::ForecasterSettings;
use crate::core::domain::{ForecastPoint, HourlyDemandObservation, RushPeriod, REGRESSOR_NAMES};
use crate::core::error::{ForecastError, ForecastResult};
use crate::forecasting::design::DesignSpec;

// Stabilizer applied to every non-changepoint diagonal entry so the normal
// equations stay solvable even on short or collinear histories.
const BASE_RIDGE: f64 = 1e-6;

/// One hour's exogenous feature values, keyed by regressor name.
///
/// Historical rows are derived from [`HourlyDemandObservation`]; future rows
/// are synthesized by the caller. A row missing a regressor the model was
/// fit with fails the fit/predict call with `MissingRegressor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub hour_timestamp: NaiveDateTime,
    pub regressors: BTreeMap<String, f64>,
}

impl FeatureRow {
    pub fn new(hour_timestamp: NaiveDateTime, regressors: BTreeMap<String, f64>) -> Self {
        Self {
            hour_timestamp,
            regressors,
        }
    }

    pub fn from_observation(obs: &HourlyDemandObservation) -> Self {
        Self {
            hour_timestamp: obs.hour_timestamp,
            regressors: obs
                .regressors()
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }

    pub fn regressor(&self, name: &str) -> Option<f64> {
        self.regressors.get(name).copied()
    }

    /// Rush label implied by this row's flags; a pure function of
    /// (is_lunch_rush, is_dinner_rush), lunch first.
    pub fn rush_period(&self) -> RushPeriod {
        let flag = |name: &str| self.regressor(name).map(|v| v > 0.5).unwrap_or(false);
        RushPeriod::from_flags(flag("is_lunch_rush"), flag("is_dinner_rush"))
    }
}

/// A fitted demand model; an opaque artifact outside this module.
///
/// `deserialize(serialize(m))` yields a model with identical predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub origin: NaiveDateTime,
    pub span_hours: f64,
    pub spec: DesignSpec,
    pub beta: Vec<f64>,
    pub sigma: f64,
    pub interval_z: f64,
}

impl FittedModel {
    /// Serialize to an opaque byte artifact.
    pub fn to_bytes(&self) -> ForecastResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| ForecastError::Internal(format!("failed to serialize model: {}", e)))
    }

    /// Deserialize a byte artifact produced by [`FittedModel::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> ForecastResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| ForecastError::Internal(format!("failed to deserialize model: {}", e)))
    }
}

/// Fits and applies the seasonal demand model.
pub struct DemandForecaster {
    settings: ForecasterSettings,
}

impl DemandForecaster {
    /// Forecaster with default settings.
    pub fn new() -> Self {
        Self {
            settings: ForecasterSettings::default(),
        }
    }

    /// Forecaster with explicit settings.
    pub fn with_settings(settings: ForecasterSettings) -> Self {
        Self { settings }
    }

    /// Fit the model on one restaurant's historical hourly demand.
    pub fn fit(&self, history: &[HourlyDemandObservation]) -> ForecastResult<FittedModel> {
        if history.is_empty() {
            return Err(ForecastError::EmptySeries(
                "fit requires at least one historical observation".to_string(),
            ));
        }

        let mut obs: Vec<&HourlyDemandObservation> = history.iter().collect();
        obs.sort_by_key(|o| o.hour_timestamp);

        let origin = obs[0].hour_timestamp;
        let span_hours = hours_between(origin, obs[obs.len() - 1].hour_timestamp).max(1.0);

        let spec = DesignSpec {
            changepoints: DesignSpec::uniform_changepoints(self.settings.n_changepoints),
            daily_order: self.settings.daily_fourier_order,
            weekly_order: self.settings.weekly_fourier_order,
            regressor_names: REGRESSOR_NAMES.iter().map(|s| s.to_string()).collect(),
        };

        let n = obs.len();
        let p = spec.n_columns();
        let mut x_data = Vec::with_capacity(n * p);
        let mut y_data = Vec::with_capacity(n);

        for (i, o) in obs.iter().enumerate() {
            let features = FeatureRow::from_observation(o);
            let t = hours_between(origin, o.hour_timestamp);
            let row = spec.row(t, t / span_hours, i, &features)?;
            x_data.extend_from_slice(&row);
            y_data.push((o.order_count as f64).ln_1p());
        }

        let x = DMatrix::from_row_slice(n, p, &x_data);
        let y = DVector::from_vec(y_data);

        let mut xtx = x.transpose() * &x;
        let changepoint_penalty = 1.0 / self.settings.changepoint_prior_scale;
        let changepoint_columns = spec.changepoint_columns();
        for j in 0..p {
            let penalty = if changepoint_columns.contains(&j) {
                changepoint_penalty
            } else {
                BASE_RIDGE
            };
            xtx[(j, j)] += penalty;
        }

        let xty = x.transpose() * &y;
        let beta = xtx
            .lu()
            .solve(&xty)
            .ok_or_else(|| ForecastError::Internal("normal equations are singular".to_string()))?;

        let residuals = &y - &x * &beta;
        let dof = n.saturating_sub(p).max(1);
        let sigma = (residuals.norm_squared() / dof as f64).sqrt();

        info!(
            "Fitted demand model on {} observations ({} design columns, sigma={:.4})",
            n, p, sigma
        );

        Ok(FittedModel {
            origin,
            span_hours,
            spec,
            beta: beta.iter().copied().collect(),
            sigma,
            interval_z: z_for_interval(self.settings.interval_width),
        })
    }

    /// Forecast `horizon_hours` future hours from the given feature rows.
    ///
    /// Point predictions are integer order counts clamped at zero; interval
    /// bounds are left unclamped. Rush labels come from the future rows'
    /// flags, never from the predicted volume.
    pub fn predict(
        &self,
        model: &FittedModel,
        horizon_hours: usize,
        future: &[FeatureRow],
    ) -> ForecastResult<Vec<ForecastPoint>> {
        if future.len() != horizon_hours {
            return Err(ForecastError::Data(format!(
                "expected {} future feature rows, got {}",
                horizon_hours,
                future.len()
            )));
        }

        let mut points = Vec::with_capacity(future.len());
        for (i, row) in future.iter().enumerate() {
            let t = hours_between(model.origin, row.hour_timestamp);
            let x = model.spec.row(t, t / model.span_hours, i, row)?;
            let yhat_log: f64 = x.iter().zip(&model.beta).map(|(a, b)| a * b).sum();

            let margin = model.interval_z * model.sigma;
            let predicted = yhat_log.exp_m1().max(0.0).floor() as u32;

            points.push(ForecastPoint {
                hour_timestamp: row.hour_timestamp,
                predicted_orders: predicted,
                lower_bound: (yhat_log - margin).exp_m1(),
                upper_bound: (yhat_log + margin).exp_m1(),
                rush_period: row.rush_period(),
            });
        }

        Ok(points)
    }
}

impl Default for DemandForecaster {
    fn default() -> Self {
        Self::new()
    }
}

fn hours_between(origin: NaiveDateTime, ts: NaiveDateTime) -> f64 {
    (ts - origin).num_minutes() as f64 / 60.0
}

/// Two-sided z value covering `width` probability mass of the standard
/// normal distribution. Uses Acklam's rational approximation of the normal
/// quantile function.
fn z_for_interval(width: f64) -> f64 {
    normal_quantile(0.5 + width.clamp(0.0, 0.998) / 2.0)
}

fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}
