//! JSON input documents
//!
//! The CLI reads snapshots of the timeline, price history and live state
//! from disk; the engine itself never performs I/O.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::generators::{ConcentratedSeriesInput, FeesSeriesInput, StandardSeriesInput};

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading input from {}", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse input file {}", path.display()))
}

pub fn load_standard(path: &Path) -> Result<StandardSeriesInput> {
    load_json(path)
}

pub fn load_concentrated(path: &Path) -> Result<ConcentratedSeriesInput> {
    load_json(path)
}

pub fn load_fees(path: &Path) -> Result<FeesSeriesInput> {
    load_json(path)
}
