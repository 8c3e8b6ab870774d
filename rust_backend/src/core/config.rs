//! Application configuration file support.
//!
//! This module provides utilities for reading pipeline configuration from
//! TOML configuration files. Every section is optional; omitted keys fall
//! back to the documented defaults.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Top-level configuration for a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub staffing: StaffingSettings,
    #[serde(default)]
    pub forecaster: ForecasterSettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
    #[serde(default)]
    pub weather: WeatherSettings,
}

/// Staffing ratio settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingSettings {
    /// Partners per predicted order when staffing optimally.
    #[serde(default = "default_partner_ratio")]
    pub partner_ratio: f64,
    /// Partners per order under the unoptimized baseline policy.
    #[serde(default = "default_baseline_ratio")]
    pub baseline_ratio: f64,
    /// Cost of one partner-hour, in rupees.
    #[serde(default = "default_cost_per_partner_hour")]
    pub cost_per_partner_hour: f64,
}

/// Forecaster model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecasterSettings {
    /// How aggressively the trend may bend at change points; lower values
    /// favor smoother trends.
    #[serde(default = "default_changepoint_prior_scale")]
    pub changepoint_prior_scale: f64,
    #[serde(default = "default_n_changepoints")]
    pub n_changepoints: usize,
    #[serde(default = "default_daily_fourier_order")]
    pub daily_fourier_order: usize,
    #[serde(default = "default_weekly_fourier_order")]
    pub weekly_fourier_order: usize,
    /// Width of the prediction interval, as a probability mass.
    #[serde(default = "default_interval_width")]
    pub interval_width: f64,
    #[serde(default = "default_horizon_hours")]
    pub horizon_hours: usize,
    /// Days held out for offline evaluation.
    #[serde(default = "default_holdout_days")]
    pub holdout_days: i64,
    /// Industry baseline error rate the model is compared against.
    #[serde(default = "default_baseline_mape")]
    pub baseline_mape: f64,
}

/// Festival calendar settings. Dates are quoted ISO strings ("2022-10-24").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarSettings {
    #[serde(default)]
    pub festival_dates: Vec<NaiveDate>,
}

/// Weather impact source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSettings {
    /// Either "constant" or "simulated".
    #[serde(default = "default_weather_mode")]
    pub mode: String,
    /// Impact value used in "constant" mode.
    #[serde(default)]
    pub value: f64,
    /// RNG seed used in "simulated" mode.
    #[serde(default = "default_weather_seed")]
    pub seed: u64,
}

fn default_partner_ratio() -> f64 {
    0.6
}

fn default_baseline_ratio() -> f64 {
    0.75
}

fn default_cost_per_partner_hour() -> f64 {
    150.0
}

fn default_changepoint_prior_scale() -> f64 {
    0.05
}

fn default_n_changepoints() -> usize {
    10
}

fn default_daily_fourier_order() -> usize {
    4
}

fn default_weekly_fourier_order() -> usize {
    3
}

fn default_interval_width() -> f64 {
    0.8
}

fn default_horizon_hours() -> usize {
    24
}

fn default_holdout_days() -> i64 {
    7
}

fn default_baseline_mape() -> f64 {
    0.35
}

fn default_weather_mode() -> String {
    "constant".to_string()
}

fn default_weather_seed() -> u64 {
    42
}

impl Default for StaffingSettings {
    fn default() -> Self {
        Self {
            partner_ratio: default_partner_ratio(),
            baseline_ratio: default_baseline_ratio(),
            cost_per_partner_hour: default_cost_per_partner_hour(),
        }
    }
}

impl Default for ForecasterSettings {
    fn default() -> Self {
        Self {
            changepoint_prior_scale: default_changepoint_prior_scale(),
            n_changepoints: default_n_changepoints(),
            daily_fourier_order: default_daily_fourier_order(),
            weekly_fourier_order: default_weekly_fourier_order(),
            interval_width: default_interval_width(),
            horizon_hours: default_horizon_hours(),
            holdout_days: default_holdout_days(),
            baseline_mape: default_baseline_mape(),
        }
    }
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            mode: default_weather_mode(),
            value: 0.0,
            seed: default_weather_seed(),
        }
    }
}

impl AppConfig {
    /// Read configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::load_from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Read configuration from a file when a path is given, otherwise fall
    /// back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}
