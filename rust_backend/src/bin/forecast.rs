//! Batch driver for the demand forecasting pipeline.
//!
//! Loads (or synthesizes) raw order events, builds the hourly demand table,
//! fits the forecaster on the busiest restaurant, and prints the dashboard
//! payload as JSON on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use dsi_rust::api;
use dsi_rust::core::config::AppConfig;
use dsi_rust::forecasting::{self, future::future_feature_rows, DemandForecaster};
use dsi_rust::io::loaders::{DemandTableStore, ModelStore, OrderEventLoader};
use dsi_rust::io::synthetic::SyntheticDataGenerator;
use dsi_rust::preprocessing::calendar::FestivalCalendar;
use dsi_rust::preprocessing::pipeline::{FeatureBuilder, FeatureConfig};
use dsi_rust::preprocessing::weather::WeatherSource;
use dsi_rust::staffing::StaffingTranslator;

#[derive(Parser, Debug)]
#[command(
    name = "forecast",
    about = "Forecast hourly restaurant demand and plan delivery staffing"
)]
struct Args {
    /// Raw order-events CSV; synthetic data is generated when absent or unreadable
    #[arg(long)]
    data: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Forecast horizon in hours (overrides the configured value)
    #[arg(long)]
    horizon: Option<usize>,

    /// Write the hourly demand table to this CSV path
    #[arg(long)]
    table_out: Option<PathBuf>,

    /// Write the fitted model artifact to this path
    #[arg(long)]
    model_out: Option<PathBuf>,

    /// Seed for synthetic data generation
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = AppConfig::load_or_default(args.config.as_deref())?;
    let horizon = args.horizon.unwrap_or(config.forecaster.horizon_hours);

    let generator = SyntheticDataGenerator::new(args.seed);
    let events = OrderEventLoader::load_or_synthetic(args.data.as_deref(), &generator);

    let calendar = FestivalCalendar::from_settings(&config.calendar);
    let weather = WeatherSource::from_settings(&config.weather)?;
    let builder = FeatureBuilder::with_config(FeatureConfig {
        calendar: calendar.clone(),
        weather,
        validate: true,
    });
    let table = builder.build(&events)?;

    if let Some(path) = &args.table_out {
        DemandTableStore::write(path, &table)?;
    }

    let restaurant = forecasting::busiest_restaurant(&table)?;
    let series = forecasting::restaurant_series(&table, restaurant)?;
    info!(
        "Forecasting restaurant {} ({} hourly observations)",
        restaurant,
        series.len()
    );

    let forecaster = DemandForecaster::with_settings(config.forecaster.clone());

    // Holdout evaluation needs more history than short fallback datasets
    // provide; skip it rather than failing the forecast.
    let evaluation = match forecasting::evaluate(
        &forecaster,
        &series,
        config.forecaster.holdout_days,
        config.forecaster.baseline_mape,
    ) {
        Ok(report) => Some(report),
        Err(e) => {
            warn!("Skipping holdout evaluation: {}", e);
            None
        }
    };

    let model = forecaster.fit(&series)?;
    if let Some(path) = &args.model_out {
        ModelStore::save(path, &model)?;
    }

    let last_hour = series
        .last()
        .context("restaurant series is never empty")?
        .hour_timestamp;
    let future = future_feature_rows(last_hour, horizon, &calendar, 0.0);
    let forecast = forecaster.predict(&model, horizon, &future)?;

    let translator = StaffingTranslator::with_settings(config.staffing.clone());
    let plan = translator.to_staffing_plan(&forecast);
    let summary = translator.summarize(&plan);

    let payload = api::dashboard_payload(&forecast, &plan, &summary, evaluation.as_ref());
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}
