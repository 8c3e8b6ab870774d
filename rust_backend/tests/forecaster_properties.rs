//! Invariant properties of the forecaster and staffing translator, plus
//! artifact persistence round-trips.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use dsi_rust::core::domain::{
    is_dinner_rush_hour, is_lunch_rush_hour, ForecastPoint, HourlyDemandObservation, RushPeriod,
    REGRESSOR_NAMES,
};
use dsi_rust::forecasting::design::DesignSpec;
use dsi_rust::forecasting::model::FeatureRow;
use dsi_rust::forecasting::{DemandForecaster, FittedModel};
use dsi_rust::io::loaders::{DemandTableStore, ModelStore};
use dsi_rust::staffing::StaffingTranslator;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 3, 7)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn history(hours: usize) -> Vec<HourlyDemandObservation> {
    (0..hours)
        .map(|i| {
            let mut obs = HourlyDemandObservation::new(
                start() + Duration::hours(i as i64),
                1,
                20 + (i % 5) as u32,
                false,
                0.0,
            );
            obs.orders_last_hour = Some(20.0);
            obs.orders_last_day_same_hour = Some(20.0);
            obs.orders_3h_mean = Some(20.0);
            obs
        })
        .collect()
}

fn future_rows(from: NaiveDateTime, horizon: usize) -> Vec<FeatureRow> {
    (0..horizon)
        .map(|i| {
            let ts = from + Duration::hours(1 + i as i64);
            FeatureRow::from_observation(&HourlyDemandObservation::new(ts, 1, 0, false, 0.0))
        })
        .collect()
}

#[test]
fn model_store_round_trip_preserves_predictions() {
    let forecaster = DemandForecaster::new();
    let model = forecaster.fit(&history(24 * 10)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demand_model.json");
    ModelStore::save(&path, &model).unwrap();
    let restored = ModelStore::load(&path).unwrap();

    let rows = future_rows(start() + Duration::hours(239), 24);
    assert_eq!(
        forecaster.predict(&model, 24, &rows).unwrap(),
        forecaster.predict(&restored, 24, &rows).unwrap()
    );
}

#[test]
fn demand_table_store_round_trip_preserves_rows() {
    let rows = history(48);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demand.csv");
    DemandTableStore::write(&path, &rows).unwrap();
    assert_eq!(DemandTableStore::read(&path).unwrap(), rows);
}

proptest! {
    #[test]
    fn no_hour_is_in_both_rush_windows(hour in 0u32..24) {
        prop_assert!(!(is_lunch_rush_hour(hour) && is_dinner_rush_hour(hour)));
    }

    #[test]
    fn partners_needed_is_at_least_one(predicted in 0u32..100_000) {
        let point = ForecastPoint {
            hour_timestamp: start(),
            predicted_orders: predicted,
            lower_bound: 0.0,
            upper_bound: predicted as f64,
            rush_period: RushPeriod::Regular,
        };
        let plan = StaffingTranslator::new().to_staffing_plan(&[point]);
        prop_assert!(plan[0].partners_needed >= 1);
    }

    #[test]
    fn predictions_are_clamped_at_zero(intercept in -20.0f64..5.0) {
        // Whatever sign the raw model output has, the point forecast is >= 0
        let spec = DesignSpec {
            changepoints: vec![],
            daily_order: 0,
            weekly_order: 0,
            regressor_names: REGRESSOR_NAMES.iter().map(|s| s.to_string()).collect(),
        };
        let mut beta = vec![0.0; spec.n_columns()];
        beta[0] = intercept;
        let model = FittedModel {
            origin: start(),
            span_hours: 24.0,
            spec,
            beta,
            sigma: 0.5,
            interval_z: 1.28,
        };

        let points = DemandForecaster::new()
            .predict(&model, 3, &future_rows(start(), 3))
            .unwrap();
        for p in &points {
            prop_assert!(p.upper_bound >= p.lower_bound);
            if intercept < 0.0 {
                // negative raw demand clamps to zero instead of erroring
                prop_assert_eq!(p.predicted_orders, 0);
            }
        }
    }

    #[test]
    fn rush_label_is_a_pure_function_of_flags(lunch in any::<bool>(), dinner in any::<bool>()) {
        let label = RushPeriod::from_flags(lunch, dinner);
        let expected = if lunch {
            RushPeriod::Lunch
        } else if dinner {
            RushPeriod::Dinner
        } else {
            RushPeriod::Regular
        };
        prop_assert_eq!(label, expected);
    }
}
