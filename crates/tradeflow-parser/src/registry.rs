use std::path::Path;

use crate::errors::{ParserAttempt, ParserError};
use crate::formats::{CsvExtractParser, WorkbookExtractParser};
use crate::model::{ExtractFormat, ParsedExtract};

pub trait ExtractParser {
    fn name(&self) -> &'static str;
    fn format(&self) -> ExtractFormat;
    fn parse(&self, path: &Path) -> Result<ParsedExtract, ParserError>;
}

/// Reads a raw trade extract, picking the parser from the file extension.
pub fn parse_extract(path: &Path) -> Result<ParsedExtract, ParserError> {
    let csv = CsvExtractParser;
    let workbook = WorkbookExtractParser;
    let parsers: [&dyn ExtractParser; 2] = [&csv, &workbook];
    parse_with_parsers(path, &parsers)
}

pub fn parse_with_parsers(
    path: &Path,
    parsers: &[&dyn ExtractParser],
) -> Result<ParsedExtract, ParserError> {
    let detected = ExtractFormat::from_path(path);
    let mut attempts = Vec::new();

    for parser in parsers {
        if Some(parser.format()) == detected {
            return parser.parse(path);
        }
        attempts.push(ParserAttempt::new(
            parser.name(),
            format!("expects {} input", parser.format()),
        ));
    }

    Err(ParserError::UnsupportedFormat {
        path: path.to_path_buf(),
        attempts,
    })
}
