mod common;
mod csv_extract;
mod workbook;

pub use csv_extract::CsvExtractParser;
pub use workbook::WorkbookExtractParser;

pub(crate) use common::{finish_table, normalize_headers, text_cell};
