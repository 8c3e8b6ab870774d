//! File-boundary loaders and stores.
//!
//! Loading raw order events is a two-step contract: `try_load` either
//! returns records or a [`LoadError`], and the caller decides whether to
//! fall back to the synthetic generator. The pipeline itself never observes
//! the substitution and behaves identically regardless of data provenance.

use anyhow::{Context, Result};
use log::{info, warn};
use polars::prelude::*;
use std::fs;
use std::path::Path;

use crate::core::domain::{HourlyDemandObservation, RawOrderEvent};
use crate::forecasting::model::FittedModel;
use crate::io::synthetic::SyntheticDataGenerator;
use crate::parsing::csv_parser;

/// Error type for order-event loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Read error: {0}")]
    Read(String),

    #[error("Malformed data: {0}")]
    Malformed(String),
}

/// Loader for raw order-event CSV files.
pub struct OrderEventLoader;

impl OrderEventLoader {
    /// Load raw order events from a CSV file.
    ///
    /// Fails with [`LoadError`] instead of substituting data; fallback is
    /// the caller's decision.
    pub fn try_load(path: &Path) -> Result<Vec<RawOrderEvent>, LoadError> {
        if !path.exists() {
            return Err(LoadError::Read(format!(
                "no such file: {}",
                path.display()
            )));
        }

        csv_parser::parse_order_events_csv_to_records(path)
            .map_err(|e| LoadError::Malformed(format!("{:#}", e)))
    }

    /// Load events from the given path, falling back to the synthetic
    /// generator when no path is given or loading fails.
    pub fn load_or_synthetic(
        path: Option<&Path>,
        generator: &SyntheticDataGenerator,
    ) -> Vec<RawOrderEvent> {
        match path {
            Some(p) => match Self::try_load(p) {
                Ok(events) => {
                    info!("Loaded {} order events from {}", events.len(), p.display());
                    events
                }
                Err(e) => {
                    warn!("Falling back to synthetic order events: {}", e);
                    generator.generate()
                }
            },
            None => {
                info!("No data path given; generating synthetic order events");
                generator.generate()
            }
        }
    }
}

/// Store for the persisted hourly demand table.
pub struct DemandTableStore;

impl DemandTableStore {
    /// Write the demand table as a flat CSV file.
    pub fn write(path: &Path, rows: &[HourlyDemandObservation]) -> Result<()> {
        let mut df = csv_parser::observations_to_dataframe(rows)
            .context("Failed to convert observations to DataFrame")?;

        let mut file = fs::File::create(path)
            .with_context(|| format!("Failed to create demand table file: {}", path.display()))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .context("Failed to write demand table CSV")?;

        info!("Wrote {} demand rows to {}", rows.len(), path.display());
        Ok(())
    }

    /// Read a demand table written by [`DemandTableStore::write`].
    pub fn read(path: &Path) -> Result<Vec<HourlyDemandObservation>> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.into()))?
            .finish()
            .with_context(|| format!("Failed to read demand table: {}", path.display()))?;

        csv_parser::dataframe_to_observations(&df)
    }
}

/// Store for fitted model artifacts. The artifact is an opaque blob; only
/// the forecaster knows its layout.
pub struct ModelStore;

impl ModelStore {
    pub fn save(path: &Path, model: &FittedModel) -> Result<()> {
        let bytes = model.to_bytes()?;
        fs::write(path, bytes)
            .with_context(|| format!("Failed to write model artifact: {}", path.display()))?;
        info!("Saved model artifact to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<FittedModel> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read model artifact: {}", path.display()))?;
        Ok(FittedModel::from_bytes(&bytes)?)
    }
}
