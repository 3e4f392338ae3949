//! Parse-or-default coercion for raw cells.
//!
//! Every raw numeric field declares its fallback through the type it is read into:
//! `f64` fields fall back to `0.0`, `Option<f64>` fields stay absent. A cell that is
//! missing, blank, unparseable or non-finite counts as unparsed.

use polars::prelude::*;

pub trait NumericFallback: Sized {
    fn from_parsed(parsed: Option<f64>) -> Self;
}

impl NumericFallback for f64 {
    fn from_parsed(parsed: Option<f64>) -> Self {
        parsed.unwrap_or(0.0)
    }
}

impl NumericFallback for Option<f64> {
    fn from_parsed(parsed: Option<f64>) -> Self {
        parsed
    }
}

pub fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Coerces a single optional text cell into the field's type.
pub fn parse_field<T: NumericFallback>(cell: Option<&str>) -> T {
    T::from_parsed(cell.and_then(parse_number))
}

/// Reads a whole column as numbers. String columns are parsed cell by cell, numeric
/// columns are widened to f64, anything else (and a missing column) is unparsed.
pub fn numeric_column<T: NumericFallback>(df: &DataFrame, name: &str) -> PolarsResult<Vec<T>> {
    let parsed = parsed_numbers(df, name)?;
    Ok(parsed.into_iter().map(T::from_parsed).collect())
}

fn parsed_numbers(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let Ok(column) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };

    match column.dtype() {
        DataType::String => Ok(column
            .str()?
            .into_iter()
            .map(|cell| cell.and_then(parse_number))
            .collect()),
        dtype if dtype.is_float() || dtype.is_integer() => {
            let widened = column.cast(&DataType::Float64)?;
            Ok(widened
                .f64()?
                .into_iter()
                .map(|value| value.filter(|v| v.is_finite()))
                .collect())
        }
        _ => Ok(vec![None; column.len()]),
    }
}

/// Reads a column as text. Only String columns carry text; a missing or
/// non-text column yields `None` for every row.
pub fn text_column<'a>(df: &'a DataFrame, name: &str) -> PolarsResult<Vec<Option<&'a str>>> {
    match df.column(name) {
        Ok(column) if column.dtype() == &DataType::String => {
            Ok(column.str()?.into_iter().collect())
        }
        Ok(column) => Ok(vec![None; column.len()]),
        Err(_) => Ok(vec![None; df.height()]),
    }
}
