use std::env;
use std::fs;
use std::path::PathBuf;

use polars::prelude::*;
use tradeflow_core::config::FeatureConfig;
use tradeflow_core::error::PipelineError;
use tradeflow_core::features::apply_features;
use tradeflow_core::outputs::{read_frame, write_frame};
use uuid::Uuid;

fn scratch_path(file_name: &str) -> PathBuf {
    env::temp_dir()
        .join(format!("tradeflow-{}", Uuid::new_v4()))
        .join(file_name)
}

fn featured_frame() -> DataFrame {
    let raw = df!(
        "IEC" => ["0511002233", "0399887766"],
        "TOTAL VALUE_INR" => [Some("1000"), None],
        "QUANTITY" => [Some("10"), Some("0")],
        "UNIT" => [Some("Nos."), None],
    )
    .unwrap();
    apply_features(&raw, &FeatureConfig::default()).unwrap()
}

#[test]
fn parquet_round_trip_keeps_types() -> PolarsResult<()> {
    let path = scratch_path("features.parquet");
    let df = featured_frame();

    write_frame(&df, &path).expect("parquet written");
    let read = read_frame(&path).expect("parquet read");

    assert!(read.equals_missing(&df));
    assert_eq!(read.column("grand_total_inr")?.dtype(), &DataType::Float64);

    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
    Ok(())
}

#[test]
fn csv_round_trip_reads_text_columns() -> PolarsResult<()> {
    let path = scratch_path("features.csv");
    let df = featured_frame();

    write_frame(&df, &path).expect("csv written");
    let read = read_frame(&path).expect("csv read");

    assert_eq!(read.shape(), df.shape());
    let iec = read.column("IEC")?.str()?;
    assert_eq!(iec.get(0), Some("0511002233"));

    let landed = read.column("landed_cost_per_unit_inr")?.str()?;
    assert!(landed.get(0).is_some());
    assert_eq!(landed.get(1), None);

    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
    Ok(())
}

#[test]
fn unsupported_extension_is_rejected() {
    let err = write_frame(&featured_frame(), &scratch_path("features.json"))
        .expect_err("json output accepted");
    assert!(matches!(err, PipelineError::Validation(_)));
}
