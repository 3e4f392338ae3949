pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::{ParserAttempt, ParserError};
pub use model::{CellValue, ExtractFormat, ParsedExtract, RawTable};
pub use registry::{parse_extract, parse_with_parsers, ExtractParser};
