use chrono::NaiveDate;
use polars::prelude::*;
use tradeflow_core::cleaning::{clean_shipments, date_column};
use tradeflow_core::columns;
use tradeflow_core::error::PipelineError;

#[test]
fn unparseable_dates_are_dropped_and_parts_added() -> PolarsResult<()> {
    let raw = df!(
        "DATE" => [Some("05-03-2019"), Some("garbage"), None, Some("2020-07-01 00:00:00")],
        "QUANTITY" => ["1", "2", "3", "4"],
    )?;

    let (cleaned, summary) = clean_shipments(&raw).expect("cleaning succeeded");

    assert_eq!(summary.rows_in, 4);
    assert_eq!(summary.rows_kept, 2);
    assert_eq!(summary.rows_dropped, 2);
    assert_eq!(cleaned.height(), 2);

    let quantity = cleaned.column("QUANTITY")?.str()?;
    assert_eq!(quantity.get(0), Some("1"));
    assert_eq!(quantity.get(1), Some("4"));

    assert_eq!(
        cleaned.column(columns::DATE_OF_SHIPMENT)?.dtype(),
        &DataType::Date
    );
    let dates = date_column(&cleaned, columns::DATE_OF_SHIPMENT)?;
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2019, 3, 5),
            NaiveDate::from_ymd_opt(2020, 7, 1)
        ]
    );

    let year = cleaned.column(columns::YEAR)?.i32()?;
    let month = cleaned.column(columns::MONTH)?.i32()?;
    assert_eq!(year.get(0), Some(2019));
    assert_eq!(month.get(0), Some(3));
    assert_eq!(year.get(1), Some(2020));
    assert_eq!(month.get(1), Some(7));

    Ok(())
}

#[test]
fn typed_date_columns_are_accepted() -> PolarsResult<()> {
    let days = Series::new("DATE".into(), vec![Some(0i32), None, Some(18_000i32)])
        .cast(&DataType::Date)?;
    let mut raw = df!("QUANTITY" => ["1", "2", "3"])?;
    raw.with_column(days)?;

    let (cleaned, summary) = clean_shipments(&raw).expect("cleaning succeeded");
    assert_eq!(summary.rows_kept, 2);

    let year = cleaned.column(columns::YEAR)?.i32()?;
    assert_eq!(year.get(0), Some(1970));
    assert_eq!(year.get(1), Some(2019));
    Ok(())
}

#[test]
fn missing_date_column_is_reported() -> PolarsResult<()> {
    let raw = df!("QUANTITY" => ["1"])?;
    match clean_shipments(&raw) {
        Err(PipelineError::MissingColumns(missing)) => assert_eq!(missing, vec!["DATE"]),
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}
