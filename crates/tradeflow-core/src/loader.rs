use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};
use tracing::info;

use crate::category::Category;
use crate::cleaning::date_column;
use crate::coerce::{numeric_column, text_column};
use crate::columns;
use crate::db::DbPool;
use crate::error::{PipelineError, Result};

pub const SHIPMENTS_TABLE: &str = "shipments";
pub const DEFAULT_BATCH_SIZE: usize = 500;

// Postgres caps a statement at 65535 bind parameters.
const MAX_BIND_PARAMS: usize = 65_535;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlKind {
    Text,
    Float,
    Integer,
    Date,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub sql_name: &'static str,
    pub kind: SqlKind,
}

const fn spec(header: &'static str, sql_name: &'static str, kind: SqlKind) -> ColumnSpec {
    ColumnSpec {
        header,
        sql_name,
        kind,
    }
}

/// Columns the `shipments` table stores, in insert order. Extract columns are stored as
/// the text they were read as; only derived and cleaned columns are typed.
pub const REQUIRED_COLUMNS: &[ColumnSpec] = &[
    spec(columns::PORT_CODE, "port_code", SqlKind::Text),
    spec(columns::DATE, "date", SqlKind::Text),
    spec(columns::IEC, "iec", SqlKind::Text),
    spec(columns::HS_CODE, "hs_code", SqlKind::Text),
    spec(columns::GOODS_DESCRIPTION, "goods_description", SqlKind::Text),
    spec(columns::MASTER_CATEGORY, "master_category", SqlKind::Text),
    spec(columns::MODEL_NAME, "model_name", SqlKind::Text),
    spec(columns::MODEL_NUMBER, "model_number", SqlKind::Text),
    spec(columns::CAPACITY, "capacity", SqlKind::Text),
    spec(columns::QTY, "qty", SqlKind::Text),
    spec(columns::UNIT_OF_MEASURE, "unit_of_measure", SqlKind::Text),
    spec(columns::PRICE, "price", SqlKind::Text),
    spec(columns::UNIT_OF_MEASURE_1, "unit_of_measure_1", SqlKind::Text),
    spec(columns::QUANTITY, "quantity", SqlKind::Text),
    spec(columns::UNIT, "unit", SqlKind::Text),
    spec(columns::UNIT_PRICE_INR, "unit_price_inr", SqlKind::Text),
    spec(columns::TOTAL_VALUE_INR, "total_value_inr", SqlKind::Text),
    spec(columns::UNIT_PRICE_USD, "unit_price_usd", SqlKind::Text),
    spec(columns::TOTAL_VALUE_USD, "total_value_usd", SqlKind::Text),
    spec(columns::DUTY_PAID_INR, "duty_paid_inr", SqlKind::Text),
    spec(columns::DATE_OF_SHIPMENT, "date_of_shipment", SqlKind::Date),
    spec(columns::YEAR, "year", SqlKind::Integer),
    spec(columns::MONTH, "month", SqlKind::Integer),
    spec(columns::GRAND_TOTAL_INR, "grand_total_inr", SqlKind::Float),
    spec(columns::UNIT_STANDARDIZED, "unit_standardized", SqlKind::Text),
    spec(columns::LANDED_COST_PER_UNIT_INR, "landed_cost_per_unit_inr", SqlKind::Float),
    spec(columns::CATEGORY, "category", SqlKind::Text),
    spec(columns::DUTY_PCT_OF_VALUE, "duty_pct_of_value", SqlKind::Float),
    spec(columns::UNIT_PRICE_USD_TO_INR, "unit_price_usd_to_inr", SqlKind::Float),
];

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(Option<String>),
    Float(Option<f64>),
    Integer(Option<i32>),
    Date(Option<NaiveDate>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        match self {
            SqlValue::Text(value) => value.is_none(),
            SqlValue::Float(value) => value.is_none(),
            SqlValue::Integer(value) => value.is_none(),
            SqlValue::Date(value) => value.is_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_inserted: usize,
    pub batches: usize,
}

/// Lists every required header absent from `df`, in canonical order.
pub fn missing_columns(df: &DataFrame) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|spec| df.column(spec.header).is_err())
        .map(|spec| spec.header.to_string())
        .collect()
}

pub fn validate_columns(df: &DataFrame) -> Result<()> {
    let missing = missing_columns(df);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::MissingColumns(missing))
    }
}

/// Every `category` cell must be one of the known labels.
pub fn validate_categories(df: &DataFrame) -> Result<()> {
    let labels = text_column(df, columns::CATEGORY)?;
    let invalid: Vec<String> = labels
        .into_iter()
        .filter(|label| label.map_or(true, |label| Category::try_from(label).is_err()))
        .map(|label| label.unwrap_or("<null>").to_string())
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Validation(format!(
            "{} rows have an invalid {}: {:?}",
            invalid.len(),
            columns::CATEGORY,
            invalid
        )))
    }
}

/// Checks everything the table constraints would reject, before a connection is used.
pub fn validate_frame(df: &DataFrame) -> Result<()> {
    validate_columns(df)?;
    validate_categories(df)
}

/// Validates `df` and narrows it to the required columns in canonical order.
pub fn canonical_frame(df: &DataFrame) -> Result<DataFrame> {
    validate_columns(df)?;
    let headers: Vec<&str> = REQUIRED_COLUMNS.iter().map(|spec| spec.header).collect();
    Ok(df.select(headers)?)
}

/// Converts one column into bindable values according to its SQL kind. A present cell
/// that does not convert to a typed kind is an error, never a silent NULL.
pub fn column_values(df: &DataFrame, spec: &ColumnSpec) -> Result<Vec<SqlValue>> {
    let values: Vec<SqlValue> = match spec.kind {
        SqlKind::Text => text_values(df.column(spec.header)?)?
            .into_iter()
            .map(SqlValue::Text)
            .collect(),
        SqlKind::Float => numeric_column::<Option<f64>>(df, spec.header)?
            .into_iter()
            .map(SqlValue::Float)
            .collect(),
        SqlKind::Integer => numeric_column::<Option<f64>>(df, spec.header)?
            .into_iter()
            .map(|value| SqlValue::Integer(value.map(|v| v as i32)))
            .collect(),
        SqlKind::Date => date_column(df, spec.header)?
            .into_iter()
            .map(SqlValue::Date)
            .collect(),
    };

    if spec.kind != SqlKind::Text {
        let column = df.column(spec.header)?;
        let present = column.len() - column.null_count();
        let converted = values.iter().filter(|value| !value.is_null()).count();
        if converted < present {
            return Err(PipelineError::Validation(format!(
                "{} values in column '{}' are not valid {:?} values",
                present - converted,
                spec.header,
                spec.kind
            )));
        }
    }
    Ok(values)
}

fn text_values(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    let text = column.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|cell| cell.map(str::to_string))
        .collect())
}

/// Rows per INSERT statement, bounded by the bind parameter limit.
pub fn effective_batch_size(requested: usize) -> usize {
    let ceiling = MAX_BIND_PARAMS / REQUIRED_COLUMNS.len();
    requested.clamp(1, ceiling)
}

/// Inserts every row of `df` into `shipments` inside one transaction.
///
/// The frame and every column conversion are checked before the transaction opens, so a
/// bad frame never leaves a partial load behind.
pub async fn load_shipments(pool: &DbPool, df: &DataFrame, batch_size: usize) -> Result<LoadSummary> {
    validate_frame(df)?;
    let frame = canonical_frame(df)?;
    let values: Vec<Vec<SqlValue>> = REQUIRED_COLUMNS
        .iter()
        .map(|spec| column_values(&frame, spec))
        .collect::<Result<_>>()?;

    let batch_size = effective_batch_size(batch_size);
    let insert_prefix = format!(
        "INSERT INTO {} ({}) ",
        SHIPMENTS_TABLE,
        REQUIRED_COLUMNS
            .iter()
            .map(|spec| spec.sql_name)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut summary = LoadSummary::default();
    let mut tx = pool.begin().await?;

    let row_indices: Vec<usize> = (0..frame.height()).collect();
    for chunk in row_indices.chunks(batch_size) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(&insert_prefix);
        builder.push_values(chunk, |mut row, &idx| {
            for column in &values {
                match &column[idx] {
                    SqlValue::Text(value) => {
                        row.push_bind(value.clone());
                    }
                    SqlValue::Float(value) => {
                        row.push_bind(*value);
                    }
                    SqlValue::Integer(value) => {
                        row.push_bind(*value);
                    }
                    SqlValue::Date(value) => {
                        row.push_bind(*value);
                    }
                }
            }
        });
        builder.build().execute(tx.as_mut()).await?;

        summary.rows_inserted += chunk.len();
        summary.batches += 1;
    }

    tx.commit().await?;

    info!(
        rows = summary.rows_inserted,
        batches = summary.batches,
        table = SHIPMENTS_TABLE,
        "Loaded shipments"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_size_respects_bind_limit() {
        assert_eq!(effective_batch_size(0), 1);
        assert_eq!(effective_batch_size(500), 500);
        assert_eq!(
            effective_batch_size(1_000_000),
            MAX_BIND_PARAMS / REQUIRED_COLUMNS.len()
        );
    }

    #[test]
    fn required_columns_are_unique() {
        let mut headers: Vec<&str> = REQUIRED_COLUMNS.iter().map(|spec| spec.header).collect();
        headers.sort_unstable();
        headers.dedup();
        assert_eq!(headers.len(), REQUIRED_COLUMNS.len());
    }
}
