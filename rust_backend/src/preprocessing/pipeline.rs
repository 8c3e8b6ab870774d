//! Feature-building pipeline: raw order events in, hourly demand table out.

use log::{info, warn};
use std::collections::BTreeMap;

use crate::core::domain::{HourlyDemandObservation, RawOrderEvent};
use crate::core::error::{ForecastError, ForecastResult};
use crate::preprocessing::calendar::FestivalCalendar;
use crate::preprocessing::features::{backward_fill, forward_fill, lag, round2, trailing_mean};
use crate::preprocessing::validator::DemandValidator;
use crate::preprocessing::weather::WeatherSource;

/// Configuration for the feature-building pipeline
pub struct FeatureConfig {
    pub calendar: FestivalCalendar,
    pub weather: WeatherSource,
    pub validate: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            calendar: FestivalCalendar::default(),
            weather: WeatherSource::Constant(0.0),
            validate: true,
        }
    }
}

/// Builds the hourly demand table from raw order events.
pub struct FeatureBuilder {
    config: FeatureConfig,
}

impl FeatureBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self {
            config: FeatureConfig::default(),
        }
    }

    /// Create a builder with custom configuration
    pub fn with_config(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Convert raw order events into a validated hourly demand table.
    ///
    /// Events are grouped by (hour-floor, restaurant), calendar and weather
    /// signals are attached, lag/rolling features are computed per restaurant
    /// ordered by hour ascending, and the fill policy runs globally before
    /// validation. Rows come back sorted by (restaurant_id, hour).
    pub fn build(&self, events: &[RawOrderEvent]) -> ForecastResult<Vec<HourlyDemandObservation>> {
        if events.is_empty() {
            return Err(ForecastError::Data(
                "no order events to aggregate".to_string(),
            ));
        }

        // Step 1: aggregate counts by (restaurant, hour)
        let mut counts: BTreeMap<(u32, chrono::NaiveDateTime), u32> = BTreeMap::new();
        for event in events {
            *counts
                .entry((event.restaurant_id, event.hour_floor()))
                .or_insert(0) += event.order_count;
        }

        // Step 2: attach hour-deterministic flags and the weather signal
        let hours: Vec<chrono::NaiveDateTime> = counts.keys().map(|(_, h)| *h).collect();
        let impacts = self.config.weather.impacts(&hours);

        let mut rows = Vec::with_capacity(counts.len());
        for ((key, order_count), impact) in counts.iter().zip(impacts) {
            let (restaurant_id, hour) = *key;
            rows.push(HourlyDemandObservation::new(
                hour,
                restaurant_id,
                *order_count,
                self.config.calendar.is_festival(hour),
                impact,
            ));
        }

        info!(
            "Aggregated {} events into {} hourly demand rows",
            events.len(),
            rows.len()
        );

        // Step 3: lag and rolling features per restaurant series
        self.add_lag_features(&mut rows);

        // Step 4: fill policy over the whole table, then completeness check
        fill_lag_columns(&mut rows)?;

        // Step 5: validate invariants
        if self.config.validate {
            let report = DemandValidator::validate(&rows);
            for warning in &report.warnings {
                warn!("demand table: {}", warning);
            }
            if !report.is_valid {
                return Err(ForecastError::Data(report.errors.join("; ")));
            }
        }

        Ok(rows)
    }

    // Rows arrive sorted by (restaurant_id, hour), so each restaurant's
    // series is a contiguous run.
    fn add_lag_features(&self, rows: &mut [HourlyDemandObservation]) {
        let mut start = 0;
        while start < rows.len() {
            let restaurant_id = rows[start].restaurant_id;
            let mut end = start;
            while end < rows.len() && rows[end].restaurant_id == restaurant_id {
                end += 1;
            }

            let series: Vec<f64> = rows[start..end]
                .iter()
                .map(|r| r.order_count as f64)
                .collect();
            let last_hour = lag(&series, 1);
            let last_day = lag(&series, 24);
            let mean_3h = trailing_mean(&series, 3);

            for (i, row) in rows[start..end].iter_mut().enumerate() {
                row.orders_last_hour = last_hour[i];
                row.orders_last_day_same_hour = last_day[i];
                row.orders_3h_mean = Some(round2(mean_3h[i]));
            }

            start = end;
        }
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Backward-fill then forward-fill each lag column across the whole table,
// in (restaurant_id, hour) order. Errors if a column stays undefined.
fn fill_lag_columns(rows: &mut [HourlyDemandObservation]) -> ForecastResult<()> {
    let columns: [(&str, fn(&HourlyDemandObservation) -> Option<f64>, fn(&mut HourlyDemandObservation, Option<f64>)); 3] = [
        (
            "orders_last_hour",
            |r| r.orders_last_hour,
            |r, v| r.orders_last_hour = v,
        ),
        (
            "orders_last_day_same_hour",
            |r| r.orders_last_day_same_hour,
            |r, v| r.orders_last_day_same_hour = v,
        ),
        (
            "orders_3h_mean",
            |r| r.orders_3h_mean,
            |r, v| r.orders_3h_mean = v,
        ),
    ];

    for (name, get, set) in columns {
        let series: Vec<Option<f64>> = rows.iter().map(get).collect();
        let filled = forward_fill(&backward_fill(&series));
        if filled.iter().any(|v| v.is_none()) {
            return Err(ForecastError::Data(format!(
                "feature '{}' is undefined after fill",
                name
            )));
        }
        for (row, value) in rows.iter_mut().zip(filled) {
            set(row, value);
        }
    }

    Ok(())
}

/// Convenience function to build the demand table with an explicit calendar
/// and weather source.
pub fn build_demand_table(
    events: &[RawOrderEvent],
    calendar: FestivalCalendar,
    weather: WeatherSource,
) -> ForecastResult<Vec<HourlyDemandObservation>> {
    let builder = FeatureBuilder::with_config(FeatureConfig {
        calendar,
        weather,
        validate: true,
    });
    builder.build(events)
}
