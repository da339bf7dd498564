//! Error types for template-pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Template error: {0}")]
    Template(#[from] template_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing record: {0}")]
    MissingRecord(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External process `{command}` failed: {status}")]
    ExternalProcess { command: String, status: String },
}

impl Error {
    /// Whether the caller passed something unusable, as opposed to an I/O or process failure
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Template(e) => e.is_invalid_argument(),
            Error::Config(_) | Error::MissingRecord(_) | Error::InvalidInput(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
