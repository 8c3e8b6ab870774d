//! Weather impact sources.
//!
//! Weather impact is injected rather than drawn from an ambient random
//! generator, so runs stay deterministic and testable. Three sources are
//! supported: a constant value, an explicit per-hour map, and a seeded
//! simulation of the categorical rain distribution
//! {0: 0.7, 0.3: 0.2, 0.7: 0.1}.

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use crate::core::config::WeatherSettings;
use crate::core::error::{ForecastError, ForecastResult};

/// The three weather impact levels: normal, moderate rain, heavy rain.
pub const WEATHER_LEVELS: [f64; 3] = [0.0, 0.3, 0.7];

/// Injectable source of per-row weather impact values.
#[derive(Debug, Clone)]
pub enum WeatherSource {
    /// Every row gets the same impact value.
    Constant(f64),
    /// Impact looked up by hour-floored timestamp; missing hours get 0.0.
    PerHour(HashMap<NaiveDateTime, f64>),
    /// Seeded draw from the categorical rain distribution, one value per
    /// row in table order.
    Simulated { seed: u64 },
}

impl WeatherSource {
    /// Build a source from configuration settings.
    pub fn from_settings(settings: &WeatherSettings) -> ForecastResult<Self> {
        match settings.mode.as_str() {
            "constant" => Ok(WeatherSource::Constant(settings.value)),
            "simulated" => Ok(WeatherSource::Simulated {
                seed: settings.seed,
            }),
            other => Err(ForecastError::Data(format!(
                "unknown weather mode '{}' (expected 'constant' or 'simulated')",
                other
            ))),
        }
    }

    /// Produce one impact value per hour, in the given order.
    pub fn impacts(&self, hours: &[NaiveDateTime]) -> Vec<f64> {
        match self {
            WeatherSource::Constant(value) => vec![*value; hours.len()],
            WeatherSource::PerHour(map) => hours
                .iter()
                .map(|h| map.get(h).copied().unwrap_or(0.0))
                .collect(),
            WeatherSource::Simulated { seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                hours.iter().map(|_| draw_level(&mut rng)).collect()
            }
        }
    }
}

// 70% normal, 20% moderate rain, 10% heavy rain
fn draw_level(rng: &mut StdRng) -> f64 {
    let u: f64 = rng.random();
    if u < 0.7 {
        WEATHER_LEVELS[0]
    } else if u < 0.9 {
        WEATHER_LEVELS[1]
    } else {
        WEATHER_LEVELS[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hours(n: usize) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::hours(i as i64))
            .collect()
    }

    #[test]
    fn constant_source_repeats_value() {
        let source = WeatherSource::Constant(0.3);
        assert_eq!(source.impacts(&hours(3)), vec![0.3, 0.3, 0.3]);
    }

    #[test]
    fn per_hour_source_defaults_missing_hours_to_zero() {
        let hs = hours(3);
        let mut map = HashMap::new();
        map.insert(hs[1], 0.7);
        let source = WeatherSource::PerHour(map);
        assert_eq!(source.impacts(&hs), vec![0.0, 0.7, 0.0]);
    }

    #[test]
    fn simulated_source_is_deterministic_per_seed() {
        let hs = hours(200);
        let a = WeatherSource::Simulated { seed: 7 }.impacts(&hs);
        let b = WeatherSource::Simulated { seed: 7 }.impacts(&hs);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| WEATHER_LEVELS.contains(v)));
        // Normal weather dominates the distribution
        let normal = a.iter().filter(|v| **v == 0.0).count();
        assert!(normal > a.len() / 2);
    }

    #[test]
    fn from_settings_rejects_unknown_mode() {
        let settings = WeatherSettings {
            mode: "doppler".to_string(),
            value: 0.0,
            seed: 1,
        };
        assert!(WeatherSource::from_settings(&settings).is_err());
    }
}
