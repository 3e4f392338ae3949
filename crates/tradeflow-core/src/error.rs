use thiserror::Error;
use tradeflow_parser::ParserError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Extract parsing failed: {0}")]
    Parser(#[from] ParserError),

    #[error("Missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Configuration file is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
