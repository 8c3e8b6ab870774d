//! CSV parsing and DataFrame conversions.
//!
//! Raw order events arrive as a flat CSV; the hourly demand table is
//! persisted as a flat CSV between the feature-building and forecasting
//! stages. Typed structs are the working representation; DataFrames are the
//! interchange format at the file boundary.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::Path;

use crate::core::domain::{HourlyDemandObservation, RawOrderEvent};

/// Accepted names per raw-event column, canonical name first. The aliases
/// cover the public store-sales export format.
const TIMESTAMP_COLUMNS: [&str; 3] = ["timestamp", "order_date", "date"];
const RESTAURANT_COLUMNS: [&str; 2] = ["restaurant_id", "store"];
const ITEM_COLUMNS: [&str; 3] = ["item_id", "menu_item_id", "item"];
const COUNT_COLUMNS: [&str; 2] = ["order_count", "sales"];

/// Column order of the persisted hourly demand table.
pub const DEMAND_TABLE_COLUMNS: [&str; 11] = [
    "hour_timestamp",
    "restaurant_id",
    "order_count",
    "is_weekend",
    "is_lunch_rush",
    "is_dinner_rush",
    "is_festival",
    "weather_impact",
    "orders_last_hour",
    "orders_last_day_same_hour",
    "orders_3h_mean",
];

/// Parse a raw order-events CSV file into a Polars DataFrame
pub fn parse_order_events_csv(csv_path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()
        .context("Failed to parse CSV into DataFrame")?;

    Ok(df)
}

/// Parse a raw order-events CSV file into typed records
pub fn parse_order_events_csv_to_records(csv_path: &Path) -> Result<Vec<RawOrderEvent>> {
    let df = parse_order_events_csv(csv_path)?;
    dataframe_to_events(&df)
}

/// Convert a raw-events DataFrame into typed records.
///
/// Timestamps may be datetimes or plain dates (parsed as midnight); numeric
/// columns are cast to integers regardless of how inference typed them.
pub fn dataframe_to_events(df: &DataFrame) -> Result<Vec<RawOrderEvent>> {
    let timestamps = required_column(df, &TIMESTAMP_COLUMNS)?;
    let timestamps = timestamps.str().context("timestamp column is not text")?;

    let restaurants = integer_column(df, &RESTAURANT_COLUMNS)?;
    let items = integer_column(df, &ITEM_COLUMNS)?;
    let counts = integer_column(df, &COUNT_COLUMNS)?;

    let mut events = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let raw_ts = timestamps
            .get(i)
            .with_context(|| format!("Missing timestamp at row {}", i))?;

        let restaurant_id = restaurants
            .get(i)
            .with_context(|| format!("Missing restaurant id at row {}", i))?;
        let item_id = items
            .get(i)
            .with_context(|| format!("Missing item id at row {}", i))?;
        let order_count = counts
            .get(i)
            .with_context(|| format!("Missing order count at row {}", i))?;

        events.push(RawOrderEvent {
            timestamp: parse_timestamp(raw_ts)?,
            restaurant_id: u32::try_from(restaurant_id)
                .with_context(|| format!("Invalid restaurant id at row {}", i))?,
            item_id: u32::try_from(item_id)
                .with_context(|| format!("Invalid item id at row {}", i))?,
            order_count: u32::try_from(order_count)
                .with_context(|| format!("Invalid order count at row {}", i))?,
        });
    }

    Ok(events)
}

/// Convert hourly demand observations to a Polars DataFrame
pub fn observations_to_dataframe(rows: &[HourlyDemandObservation]) -> Result<DataFrame> {
    let n = rows.len();

    let mut hours = Vec::with_capacity(n);
    let mut restaurants = Vec::with_capacity(n);
    let mut counts = Vec::with_capacity(n);
    let mut weekends = Vec::with_capacity(n);
    let mut lunch_flags = Vec::with_capacity(n);
    let mut dinner_flags = Vec::with_capacity(n);
    let mut festival_flags = Vec::with_capacity(n);
    let mut weather = Vec::with_capacity(n);
    let mut last_hour = Vec::with_capacity(n);
    let mut last_day = Vec::with_capacity(n);
    let mut mean_3h = Vec::with_capacity(n);

    for row in rows {
        hours.push(row.hour_timestamp.format("%Y-%m-%d %H:%M:%S").to_string());
        restaurants.push(row.restaurant_id as i64);
        counts.push(row.order_count as i64);
        weekends.push(row.is_weekend);
        lunch_flags.push(row.is_lunch_rush);
        dinner_flags.push(row.is_dinner_rush);
        festival_flags.push(row.is_festival);
        weather.push(row.weather_impact);
        last_hour.push(row.orders_last_hour);
        last_day.push(row.orders_last_day_same_hour);
        mean_3h.push(row.orders_3h_mean);
    }

    let df = df!(
        "hour_timestamp" => hours,
        "restaurant_id" => restaurants,
        "order_count" => counts,
        "is_weekend" => weekends,
        "is_lunch_rush" => lunch_flags,
        "is_dinner_rush" => dinner_flags,
        "is_festival" => festival_flags,
        "weather_impact" => weather,
        "orders_last_hour" => last_hour,
        "orders_last_day_same_hour" => last_day,
        "orders_3h_mean" => mean_3h,
    )?;

    Ok(df)
}

/// Convert a persisted demand-table DataFrame back into typed observations
pub fn dataframe_to_observations(df: &DataFrame) -> Result<Vec<HourlyDemandObservation>> {
    for name in DEMAND_TABLE_COLUMNS {
        if df.column(name).is_err() {
            bail!("Missing required column: {}", name);
        }
    }

    let hours = df.column("hour_timestamp")?.str()?;
    let restaurants = df.column("restaurant_id")?.cast(&DataType::Int64)?;
    let restaurants = restaurants.i64()?;
    let counts = df.column("order_count")?.cast(&DataType::Int64)?;
    let counts = counts.i64()?;
    let weekends = df.column("is_weekend")?.bool()?;
    let lunch_flags = df.column("is_lunch_rush")?.bool()?;
    let dinner_flags = df.column("is_dinner_rush")?.bool()?;
    let festival_flags = df.column("is_festival")?.bool()?;
    let weather = df.column("weather_impact")?.cast(&DataType::Float64)?;
    let weather = weather.f64()?;
    let last_hour = df.column("orders_last_hour")?.cast(&DataType::Float64)?;
    let last_hour = last_hour.f64()?;
    let last_day = df
        .column("orders_last_day_same_hour")?
        .cast(&DataType::Float64)?;
    let last_day = last_day.f64()?;
    let mean_3h = df.column("orders_3h_mean")?.cast(&DataType::Float64)?;
    let mean_3h = mean_3h.f64()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let raw_ts = hours
            .get(i)
            .with_context(|| format!("Missing hour_timestamp at row {}", i))?;
        let restaurant_id = restaurants
            .get(i)
            .with_context(|| format!("Missing restaurant_id at row {}", i))?;
        let order_count = counts
            .get(i)
            .with_context(|| format!("Missing order_count at row {}", i))?;

        rows.push(HourlyDemandObservation {
            hour_timestamp: parse_timestamp(raw_ts)?,
            restaurant_id: u32::try_from(restaurant_id)
                .with_context(|| format!("Invalid restaurant_id at row {}", i))?,
            order_count: u32::try_from(order_count)
                .with_context(|| format!("Invalid order_count at row {}", i))?,
            is_weekend: weekends.get(i).unwrap_or(false),
            is_lunch_rush: lunch_flags.get(i).unwrap_or(false),
            is_dinner_rush: dinner_flags.get(i).unwrap_or(false),
            is_festival: festival_flags.get(i).unwrap_or(false),
            weather_impact: weather.get(i).unwrap_or(0.0),
            orders_last_hour: last_hour.get(i),
            orders_last_day_same_hour: last_day.get(i),
            orders_3h_mean: mean_3h.get(i),
        });
    }

    Ok(rows)
}

// First matching column name wins; canonical names are listed first.
fn required_column<'a>(df: &'a DataFrame, names: &[&str]) -> Result<&'a Column> {
    for name in names {
        if let Ok(column) = df.column(name) {
            return Ok(column);
        }
    }
    bail!("Missing required column: {}", names[0])
}

fn integer_column(df: &DataFrame, names: &[&str]) -> Result<Int64Chunked> {
    let column = required_column(df, names)?;
    let casted = column
        .cast(&DataType::Int64)
        .with_context(|| format!("Column '{}' is not numeric", names[0]))?;
    Ok(casted.i64()?.clone())
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }
    // Plain dates (the public dataset is daily) parse as midnight
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).expect("midnight is always valid"));
    }
    bail!("Unrecognized timestamp format: {}", raw)
}
