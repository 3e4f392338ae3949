use chrono::NaiveDate;
use polars::prelude::*;
use tradeflow_core::columns;
use tradeflow_core::error::PipelineError;
use tradeflow_core::loader::{
    canonical_frame, column_values, missing_columns, validate_categories, validate_columns,
    validate_frame, ColumnSpec, SqlKind, SqlValue, REQUIRED_COLUMNS,
};

fn spec(header: &'static str, kind: SqlKind) -> ColumnSpec {
    ColumnSpec {
        header,
        sql_name: header,
        kind,
    }
}

fn complete_frame() -> DataFrame {
    // reversed so that reordering is observable
    let columns: Vec<Column> = REQUIRED_COLUMNS
        .iter()
        .rev()
        .map(|spec| Series::new(spec.header.into(), vec![Some("1"), None]).into())
        .collect();
    let mut df = DataFrame::new(columns).unwrap();
    df.with_column(Series::new("extra".into(), vec!["a", "b"]))
        .unwrap();
    df
}

#[test]
fn missing_columns_are_listed_in_canonical_order() -> PolarsResult<()> {
    let df = complete_frame().drop_many([columns::CATEGORY, columns::PORT_CODE, columns::QTY]);

    assert_eq!(
        missing_columns(&df),
        vec![columns::PORT_CODE, columns::QTY, columns::CATEGORY]
    );

    match validate_columns(&df) {
        Err(PipelineError::MissingColumns(missing)) => assert_eq!(missing.len(), 3),
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn canonical_frame_orders_and_narrows() {
    let frame = canonical_frame(&complete_frame()).expect("complete frame validates");

    let names: Vec<&str> = frame
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .collect();
    let expected: Vec<&str> = REQUIRED_COLUMNS.iter().map(|spec| spec.header).collect();
    assert_eq!(names, expected);
    assert_eq!(frame.height(), 2);
}

#[test]
fn raw_extract_without_features_is_rejected() -> PolarsResult<()> {
    let df = df!(
        "PORT CODE" => ["INNSA1"],
        "DATE" => ["05-03-2019"],
    )?;

    let missing = missing_columns(&df);
    assert!(missing.contains(&columns::GRAND_TOTAL_INR.to_string()));
    assert!(missing.contains(&columns::DATE_OF_SHIPMENT.to_string()));
    assert!(!missing.contains(&columns::PORT_CODE.to_string()));
    Ok(())
}

#[test]
fn values_follow_sql_kind() -> PolarsResult<()> {
    let mut df = df!(
        "text" => [Some(" keep spacing "), None],
        "number_text" => [Some("12.5"), None],
        "number" => [Some(3.0f64), None],
        "year" => [Some(2019i32), None],
        "date_text" => [Some("2019-03-05"), None],
    )?;
    let typed_date =
        Series::new("date".into(), vec![Some(17_960i32), None]).cast(&DataType::Date)?;
    df.with_column(typed_date)?;

    let text = column_values(&df, &spec("text", SqlKind::Text)).expect("text values");
    assert_eq!(
        text,
        vec![
            SqlValue::Text(Some(" keep spacing ".to_string())),
            SqlValue::Text(None)
        ]
    );

    let numbers_as_text =
        column_values(&df, &spec("number", SqlKind::Text)).expect("numeric column as text");
    assert_eq!(numbers_as_text[1], SqlValue::Text(None));

    let floats = column_values(&df, &spec("number_text", SqlKind::Float)).expect("float values");
    assert_eq!(floats, vec![SqlValue::Float(Some(12.5)), SqlValue::Float(None)]);

    let ints = column_values(&df, &spec("year", SqlKind::Integer)).expect("integer values");
    assert_eq!(ints, vec![SqlValue::Integer(Some(2019)), SqlValue::Integer(None)]);

    let expected_date = NaiveDate::from_ymd_opt(2019, 3, 5);
    let parsed_dates = column_values(&df, &spec("date_text", SqlKind::Date)).expect("text dates");
    assert_eq!(parsed_dates, vec![SqlValue::Date(expected_date), SqlValue::Date(None)]);

    let typed_dates = column_values(&df, &spec("date", SqlKind::Date)).expect("typed dates");
    assert_eq!(typed_dates, vec![SqlValue::Date(expected_date), SqlValue::Date(None)]);

    Ok(())
}

#[test]
fn extract_columns_keep_their_raw_text() -> PolarsResult<()> {
    let df = df!(columns::QTY => [Some("10 PCS"), Some("5"), None])?;
    let qty = REQUIRED_COLUMNS
        .iter()
        .find(|spec| spec.header == columns::QTY)
        .expect("Qty is stored");
    assert_eq!(qty.kind, SqlKind::Text);

    let values = column_values(&df, qty).expect("text values");
    assert_eq!(
        values,
        vec![
            SqlValue::Text(Some("10 PCS".to_string())),
            SqlValue::Text(Some("5".to_string())),
            SqlValue::Text(None)
        ]
    );
    Ok(())
}

#[test]
fn unconvertible_typed_values_are_rejected() -> PolarsResult<()> {
    let df = df!(
        "landed" => [Some("10 PCS"), Some("5"), None],
        "shipped" => [Some("2019-03-05"), Some("soon"), None],
    )?;

    match column_values(&df, &spec("landed", SqlKind::Float)) {
        Err(PipelineError::Validation(message)) => {
            assert!(message.contains("1 values"), "{message}");
            assert!(message.contains("landed"), "{message}");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        column_values(&df, &spec("shipped", SqlKind::Date)),
        Err(PipelineError::Validation(_))
    ));
    Ok(())
}

#[test]
fn unknown_category_labels_are_rejected() -> PolarsResult<()> {
    let valid = df!(columns::CATEGORY => ["Glass", "Others", "Polyhouse"])?;
    assert!(validate_categories(&valid).is_ok());

    let invalid = df!(columns::CATEGORY => [Some("Glass"), Some("Metal"), None])?;
    match validate_categories(&invalid) {
        Err(PipelineError::Validation(message)) => {
            assert!(message.contains("Metal"), "{message}");
            assert!(message.starts_with("2 rows"), "{message}");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // a full frame with bad labels fails the same pre-connection check
    let mut frame = complete_frame();
    frame.with_column(Series::new(columns::CATEGORY.into(), vec!["Metal", "Glass"]))?;
    assert!(matches!(
        validate_frame(&frame),
        Err(PipelineError::Validation(_))
    ));
    Ok(())
}
