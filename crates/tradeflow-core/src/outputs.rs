use std::fs::{self, File};
use std::path::Path;

use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::*;
use tracing::info;
use tradeflow_parser::parse_extract;

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Parquet,
    Csv,
}

impl FrameFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("parquet") => Ok(FrameFormat::Parquet),
            Some("csv") => Ok(FrameFormat::Csv),
            _ => Err(PipelineError::Validation(format!(
                "unsupported output format for {} (expected .parquet or .csv)",
                path.display()
            ))),
        }
    }
}

/// Writes a stage's frame to disk, creating parent directories as needed.
pub fn write_frame(df: &DataFrame, path: &Path) -> Result<()> {
    let format = FrameFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    let mut clone = df.clone();
    match format {
        FrameFormat::Parquet => {
            ParquetWriter::new(&mut file)
                .with_compression(ParquetCompression::Zstd(None))
                .with_statistics(StatisticsOptions::default())
                .finish(&mut clone)?;
        }
        FrameFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut clone)?;
        }
    }

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Wrote frame"
    );
    Ok(())
}

/// Reads a stage input. Parquet keeps its column types; CSV and workbook files go through
/// the raw extract parser and come back as text columns.
pub fn read_frame(path: &Path) -> Result<DataFrame> {
    let is_parquet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

    let df = if is_parquet {
        let file = File::open(path)?;
        ParquetReader::new(file).finish()?
    } else {
        parse_extract(path)?.df
    };

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Read frame"
    );
    Ok(df)
}
