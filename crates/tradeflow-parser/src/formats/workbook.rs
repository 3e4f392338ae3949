use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};

use crate::errors::ParserError;
use crate::formats::{finish_table, normalize_headers, text_cell};
use crate::model::{CellValue, ExtractFormat, ParsedExtract, RawTable};
use crate::registry::ExtractParser;

const PARSER_NAME: &str = "WorkbookExtract";

/// Reads the first worksheet of an Excel/ODS workbook.
pub struct WorkbookExtractParser;

impl WorkbookExtractParser {
    pub fn parse_range(&self, range: &Range<Data>) -> Result<RawTable, ParserError> {
        let mut rows_iter = range.rows();

        let header = rows_iter
            .next()
            .ok_or(ParserError::EmptyData { parser: PARSER_NAME })?;
        let headers = normalize_headers(
            header
                .iter()
                .map(|cell| read_cell(cell).map(|value| value.to_string()))
                .map(Option::unwrap_or_default),
        );

        let mut rows = Vec::new();
        for row in rows_iter {
            let cells: Vec<Option<CellValue>> = row.iter().map(read_cell).collect();
            if cells.iter().flatten().all(CellValue::is_blank) {
                continue;
            }
            rows.push(cells);
        }

        finish_table(PARSER_NAME, headers, rows)
    }
}

impl ExtractParser for WorkbookExtractParser {
    fn name(&self) -> &'static str {
        PARSER_NAME
    }

    fn format(&self) -> ExtractFormat {
        ExtractFormat::Workbook
    }

    fn parse(&self, path: &Path) -> Result<ParsedExtract, ParserError> {
        if !path.exists() {
            return Err(ParserError::Io {
                parser: PARSER_NAME,
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }

        let mut workbook = open_workbook_auto(path).map_err(|err| ParserError::Workbook {
            parser: PARSER_NAME,
            message: format!("failed to open {}: {}", path.display(), err),
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ParserError::Workbook {
                parser: PARSER_NAME,
                message: "workbook has no worksheets".to_string(),
            })?
            .map_err(|err| ParserError::Workbook {
                parser: PARSER_NAME,
                message: format!("failed to read first worksheet: {}", err),
            })?;

        let table = self.parse_range(&range)?;
        let df = table
            .into_dataframe()
            .map_err(|err| ParserError::Validation {
                parser: PARSER_NAME,
                message: err.to_string(),
            })?;

        Ok(ParsedExtract {
            source: path.to_path_buf(),
            format: ExtractFormat::Workbook,
            df,
        })
    }
}

/// Numbers and booleans keep their type; dates become ISO text so the cleaning stage
/// parses them like any other date string.
fn read_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(value) => text_cell(value),
        Data::Int(value) => Some(CellValue::Integer(*value)),
        Data::Float(value) => value.is_finite().then_some(CellValue::Float(*value)),
        Data::Bool(value) => Some(CellValue::Bool(*value)),
        Data::DateTime(_) => cell.as_datetime().map(|dt| {
            let text = if dt.time() == chrono::NaiveTime::MIN {
                dt.format("%Y-%m-%d").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            };
            CellValue::Text(text)
        }),
        Data::DateTimeIso(value) | Data::DurationIso(value) => text_cell(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;

    #[test]
    fn integral_floats_render_without_fraction() {
        assert_eq!(CellValue::Float(12.0).to_string(), "12");
        assert_eq!(CellValue::Float(12.5).to_string(), "12.5");
        assert_eq!(CellValue::Float(-3.0).to_string(), "-3");
    }

    #[test]
    fn range_cells_keep_their_types() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("UNIT".into()));
        range.set_value((0, 1), Data::String("QUANTITY".into()));
        range.set_value((0, 2), Data::String("UNIT".into()));
        range.set_value((1, 0), Data::String("Nos.".into()));
        range.set_value((1, 1), Data::Float(10.0));
        range.set_value((1, 2), Data::Int(3));
        range.set_value((2, 1), Data::Int(4));

        let table = WorkbookExtractParser
            .parse_range(&range)
            .expect("range parses");

        assert_eq!(table.headers, vec!["UNIT", "QUANTITY", "UNIT.1"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.rows[0][0], Some(CellValue::Text("Nos.".to_string())));
        assert_eq!(table.rows[0][1], Some(CellValue::Float(10.0)));
        assert_eq!(table.rows[1][0], None);
        assert_eq!(table.rows[1][1], Some(CellValue::Integer(4)));

        let df = table.into_dataframe().expect("frame");
        assert_eq!(df.column("UNIT").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("QUANTITY").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("UNIT.1").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn mixed_columns_fall_back_to_text() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 0));
        range.set_value((0, 0), Data::String("IEC".into()));
        range.set_value((1, 0), Data::String("0511002233".into()));
        range.set_value((2, 0), Data::Float(399887766.0));

        let df = WorkbookExtractParser
            .parse_range(&range)
            .expect("range parses")
            .into_dataframe()
            .expect("frame");

        let iec = df.column("IEC").unwrap().str().unwrap();
        assert_eq!(iec.get(0), Some("0511002233"));
        assert_eq!(iec.get(1), Some("399887766"));
    }
}
