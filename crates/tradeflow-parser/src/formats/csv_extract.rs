use std::fs;
use std::path::Path;

use csv::ReaderBuilder;

use crate::errors::ParserError;
use crate::formats::{finish_table, normalize_headers, text_cell};
use crate::model::{ExtractFormat, ParsedExtract, RawTable};
use crate::registry::ExtractParser;

const PARSER_NAME: &str = "CsvExtract";

pub struct CsvExtractParser;

impl CsvExtractParser {
    /// Reads CSV text with the first record as header.
    pub fn parse_content(&self, content: &str) -> Result<RawTable, ParserError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record.map_err(|source| ParserError::Csv {
                parser: PARSER_NAME,
                source,
            })?,
            None => return Err(ParserError::EmptyData { parser: PARSER_NAME }),
        };
        let headers = normalize_headers(header.iter());

        let mut rows = Vec::new();
        for record in records {
            let record = record.map_err(|source| ParserError::Csv {
                parser: PARSER_NAME,
                source,
            })?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            rows.push(record.iter().map(text_cell).collect());
        }

        finish_table(PARSER_NAME, headers, rows)
    }
}

impl ExtractParser for CsvExtractParser {
    fn name(&self) -> &'static str {
        PARSER_NAME
    }

    fn format(&self) -> ExtractFormat {
        ExtractFormat::Csv
    }

    fn parse(&self, path: &Path) -> Result<ParsedExtract, ParserError> {
        let content = fs::read_to_string(path).map_err(|source| ParserError::Io {
            parser: PARSER_NAME,
            path: path.to_path_buf(),
            source,
        })?;

        let table = self.parse_content(&content)?;
        let df = table
            .into_dataframe()
            .map_err(|err| ParserError::Validation {
                parser: PARSER_NAME,
                message: err.to_string(),
            })?;

        Ok(ParsedExtract {
            source: path.to_path_buf(),
            format: ExtractFormat::Csv,
            df,
        })
    }
}
