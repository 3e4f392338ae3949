use chrono::{DateTime, Datelike, NaiveDate, Utc};
use polars::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::columns;
use crate::error::{PipelineError, Result};

/// Day-first layouts tried in order. Two-digit-year layouts go first so that
/// `05-03-19` is not read as year 19.
const DATE_FORMATS: &[&str] = &[
    "%d-%m-%y", "%d/%m/%y", "%d.%m.%y", "%d-%b-%y", "%d %b %y", "%d-%m-%Y", "%d/%m/%Y",
    "%d.%m.%Y", "%d-%b-%Y", "%d %b %Y", "%Y-%m-%d", "%Y/%m/%d",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningSummary {
    pub rows_in: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
}

/// Parses a day-first shipment date. A trailing time part (`05-03-2019 10:30:00`,
/// `2019-03-05T10:30:00`) is ignored.
pub fn parse_day_first(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS.iter().find_map(|format| {
        let (date, remainder) = NaiveDate::parse_and_remainder(text, format).ok()?;
        let remainder_ok = remainder.is_empty()
            || remainder.starts_with(' ')
            || remainder.starts_with('T');
        remainder_ok.then_some(date)
    })
}

fn unix_epoch() -> NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}

pub fn date_to_days(date: NaiveDate) -> i32 {
    (date - unix_epoch()).num_days() as i32
}

pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    unix_epoch().checked_add_signed(chrono::Duration::days(i64::from(days)))
}

/// Reads a column as calendar dates. Text is parsed day-first; Date and Datetime
/// columns are taken as they are; anything else is unparsed.
pub fn date_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let column = df.column(name)?;
    match column.dtype() {
        DataType::String => Ok(column
            .str()?
            .into_iter()
            .map(|cell| cell.and_then(parse_day_first))
            .collect()),
        DataType::Date | DataType::Datetime(_, _) => {
            let days = column.cast(&DataType::Date)?.cast(&DataType::Int32)?;
            Ok(days
                .i32()?
                .into_iter()
                .map(|value| value.and_then(days_to_date))
                .collect())
        }
        _ => Ok(vec![None; column.len()]),
    }
}

/// Adds `date_of_shipment`, `year` and `month` and drops rows whose `DATE` does not parse.
pub fn clean_shipments(df: &DataFrame) -> Result<(DataFrame, CleaningSummary)> {
    if df.column(columns::DATE).is_err() {
        return Err(PipelineError::MissingColumns(vec![columns::DATE.to_string()]));
    }

    let dates = date_column(df, columns::DATE)?;
    let mask: Vec<bool> = dates.iter().map(Option::is_some).collect();
    let kept_dates: Vec<NaiveDate> = dates.into_iter().flatten().collect();

    let summary = CleaningSummary {
        rows_in: df.height(),
        rows_kept: kept_dates.len(),
        rows_dropped: df.height() - kept_dates.len(),
    };

    let mut cleaned = df.filter(&BooleanChunked::from_slice("keep".into(), &mask))?;

    let days: Vec<i32> = kept_dates.iter().copied().map(date_to_days).collect();
    let years: Vec<i32> = kept_dates.iter().map(|date| date.year()).collect();
    let months: Vec<i32> = kept_dates.iter().map(|date| date.month() as i32).collect();

    cleaned.with_column(
        Series::new(columns::DATE_OF_SHIPMENT.into(), days).cast(&DataType::Date)?,
    )?;
    cleaned.with_column(Series::new(columns::YEAR.into(), years))?;
    cleaned.with_column(Series::new(columns::MONTH.into(), months))?;

    if summary.rows_dropped > 0 {
        warn!(
            rows_dropped = summary.rows_dropped,
            "Dropped rows with unparseable shipment dates"
        );
    }
    info!(
        rows_in = summary.rows_in,
        rows_kept = summary.rows_kept,
        "Cleaned shipment extract"
    );

    Ok((cleaned, summary))
}
