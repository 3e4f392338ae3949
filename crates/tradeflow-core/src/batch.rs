use std::path::Path;

use polars::prelude::DataFrame;
use serde::Serialize;

use crate::cleaning::{clean_shipments, CleaningSummary};
use crate::config::FeatureConfig;
use crate::error::Result;
use crate::features::{derive_features, FeatureSummary};
use crate::outputs::read_frame;

/// Result of running the cleaning and feature stages over one extract.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub frame: DataFrame,
    pub summary: BatchSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub cleaning: CleaningSummary,
    pub features: FeatureSummary,
}

pub fn process_frame(raw: &DataFrame, config: &FeatureConfig) -> Result<BatchOutcome> {
    config.validate()?;
    let (cleaned, cleaning) = clean_shipments(raw)?;
    let (frame, features) = derive_features(&cleaned, config)?;

    Ok(BatchOutcome {
        frame,
        summary: BatchSummary { cleaning, features },
    })
}

pub fn process_extract(path: &Path, config: &FeatureConfig) -> Result<BatchOutcome> {
    let raw = read_frame(path)?;
    process_frame(&raw, config)
}
