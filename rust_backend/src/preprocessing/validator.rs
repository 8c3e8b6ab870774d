//! Demand table validation with error and warning reporting.
//!
//! Validates the hourly demand table for the invariants the forecaster
//! relies on: row uniqueness per (hour, restaurant), disjoint rush flags,
//! and fully defined lag features after the fill policy has run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::domain::HourlyDemandObservation;
use crate::preprocessing::weather::WEATHER_LEVELS;

/// Validation outcome with categorized issues and statistics.
///
/// Errors make `is_valid` false; warnings are informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary statistics computed during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_rows: usize,
    pub restaurants: usize,
    pub duplicate_pairs: usize,
    pub incomplete_features: usize,
    pub lunch_rush_rows: usize,
    pub dinner_rush_rows: usize,
    pub weekend_rows: usize,
    pub festival_rows: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for hourly demand tables.
pub struct DemandValidator;

impl DemandValidator {
    /// Validate a demand table that has been through the feature pipeline.
    pub fn validate(rows: &[HourlyDemandObservation]) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.stats.total_rows = rows.len();

        if rows.is_empty() {
            result.add_error("demand table is empty".to_string());
            return result;
        }

        let mut seen = BTreeSet::new();
        let mut restaurants = BTreeSet::new();

        for (i, row) in rows.iter().enumerate() {
            restaurants.insert(row.restaurant_id);

            if !seen.insert((row.restaurant_id, row.hour_timestamp)) {
                result.stats.duplicate_pairs += 1;
                result.add_error(format!(
                    "duplicate (hour, restaurant) pair at row {}: ({}, {})",
                    i, row.hour_timestamp, row.restaurant_id
                ));
            }

            if row.is_lunch_rush && row.is_dinner_rush {
                result.add_error(format!(
                    "row {} is flagged as both lunch and dinner rush",
                    i
                ));
            }

            if !row.features_complete() {
                result.stats.incomplete_features += 1;
            }

            let known_level = WEATHER_LEVELS
                .iter()
                .any(|level| (row.weather_impact - level).abs() < 1e-9);
            if !known_level {
                result.add_warning(format!(
                    "row {} has weather_impact {} outside the known levels",
                    i, row.weather_impact
                ));
            }

            if row.is_lunch_rush {
                result.stats.lunch_rush_rows += 1;
            }
            if row.is_dinner_rush {
                result.stats.dinner_rush_rows += 1;
            }
            if row.is_weekend {
                result.stats.weekend_rows += 1;
            }
            if row.is_festival {
                result.stats.festival_rows += 1;
            }
        }

        result.stats.restaurants = restaurants.len();

        if result.stats.incomplete_features > 0 {
            result.add_error(format!(
                "{} rows have undefined lag features after fill",
                result.stats.incomplete_features
            ));
        }

        result
    }
}
