use std::fmt;
use std::path::{Path, PathBuf};

use polars::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractFormat {
    Csv,
    Workbook,
}

impl ExtractFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractFormat::Csv => "csv",
            ExtractFormat::Workbook => "workbook",
        }
    }

    /// Guess the format from a file extension. Matching is case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(ExtractFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(ExtractFormat::Workbook),
            _ => None,
        }
    }
}

impl fmt::Display for ExtractFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One non-empty cell. CSV extracts only produce `Text`; workbooks keep the cell type
/// the spreadsheet stored.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Text(value) if value.trim().is_empty())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(value) => f.write_str(value),
            CellValue::Integer(value) => write!(f, "{value}"),
            CellValue::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            CellValue::Float(value) => write!(f, "{value}"),
            CellValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Column type chosen from the cells a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Text,
    Integer,
    Float,
    Bool,
}

impl ColumnKind {
    /// Integer and float cells widen to Float; any other mix falls back to Text.
    fn of(cells: &[Option<CellValue>]) -> Self {
        let mut kind = None;
        for cell in cells.iter().flatten() {
            let cell_kind = match cell {
                CellValue::Text(_) => return ColumnKind::Text,
                CellValue::Integer(_) => ColumnKind::Integer,
                CellValue::Float(_) => ColumnKind::Float,
                CellValue::Bool(_) => ColumnKind::Bool,
            };
            kind = Some(match (kind, cell_kind) {
                (None, next) => next,
                (Some(current), next) if current == next => current,
                (Some(ColumnKind::Integer), ColumnKind::Float)
                | (Some(ColumnKind::Float), ColumnKind::Integer) => ColumnKind::Float,
                _ => return ColumnKind::Text,
            });
        }
        kind.unwrap_or(ColumnKind::Text)
    }
}

fn build_column(name: &str, cells: Vec<Option<CellValue>>) -> Column {
    let name = PlSmallStr::from(name);
    match ColumnKind::of(&cells) {
        ColumnKind::Integer => {
            let values: Vec<Option<i64>> = cells
                .into_iter()
                .map(|cell| match cell {
                    Some(CellValue::Integer(value)) => Some(value),
                    _ => None,
                })
                .collect();
            Series::new(name, values).into()
        }
        ColumnKind::Float => {
            let values: Vec<Option<f64>> = cells
                .into_iter()
                .map(|cell| match cell {
                    Some(CellValue::Float(value)) => Some(value),
                    Some(CellValue::Integer(value)) => Some(value as f64),
                    _ => None,
                })
                .collect();
            Series::new(name, values).into()
        }
        ColumnKind::Bool => {
            let values: Vec<Option<bool>> = cells
                .into_iter()
                .map(|cell| match cell {
                    Some(CellValue::Bool(value)) => Some(value),
                    _ => None,
                })
                .collect();
            Series::new(name, values).into()
        }
        ColumnKind::Text => {
            let values: Vec<Option<String>> = cells
                .into_iter()
                .map(|cell| cell.map(|value| value.to_string()))
                .collect();
            Series::new(name, values).into()
        }
    }
}

/// Header plus cells as read from the extract. `None` marks an empty cell.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<CellValue>>>,
}

impl RawTable {
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Builds one column per header. A column whose cells are all numbers (or all
    /// booleans) keeps that type; every other column is String. Every row must already be
    /// `width()` cells long.
    pub fn into_dataframe(self) -> PolarsResult<DataFrame> {
        let RawTable { headers, rows } = self;
        let mut cells: Vec<Vec<Option<CellValue>>> = headers
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for row in rows {
            for (column, value) in cells.iter_mut().zip(row) {
                column.push(value);
            }
        }

        let columns: Vec<Column> = headers
            .iter()
            .zip(cells)
            .map(|(name, values)| build_column(name, values))
            .collect();

        DataFrame::new(columns)
    }
}

#[derive(Debug, Clone)]
pub struct ParsedExtract {
    pub source: PathBuf,
    pub format: ExtractFormat,
    pub df: DataFrame,
}

impl ParsedExtract {
    pub fn row_count(&self) -> usize {
        self.df.height()
    }
}
