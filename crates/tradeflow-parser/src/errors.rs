use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct ParserAttempt {
    pub parser: &'static str,
    pub message: String,
}

impl ParserAttempt {
    pub fn new(parser: &'static str, message: impl Into<String>) -> Self {
        Self {
            parser,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParserAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.parser, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{parser} cannot read {path}: {source}")]
    Io {
        parser: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{parser} CSV error: {source}")]
    Csv {
        parser: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{parser} workbook error: {message}")]
    Workbook {
        parser: &'static str,
        message: String,
    },

    #[error("{parser} row {line_index} has {found} cells but the header has {expected}")]
    RaggedRow {
        parser: &'static str,
        line_index: usize,
        expected: usize,
        found: usize,
    },

    #[error("{parser} validation error: {message}")]
    Validation {
        parser: &'static str,
        message: String,
    },

    #[error("{parser} file has no header row")]
    EmptyData { parser: &'static str },

    #[error("no parser recognized {path}; attempts: {attempts:?}")]
    UnsupportedFormat {
        path: PathBuf,
        attempts: Vec<ParserAttempt>,
    },
}
