// src/utils/error.rs
use std::fmt;
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Could not read document: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("Could not decode PDF: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Result table not found: {0}")]
    TableNotFound(String),

    #[error("Result table {path} could not be parsed: {reason}")]
    Unparsable { path: String, reason: String },
}

/// Stable classification of failures surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Decode,
    Read,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Input => "InputError",
            ErrorKind::Decode => "DecodeError",
            ErrorKind::Read => "ReadError",
            ErrorKind::Internal => "InternalError",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing input: {0}")]
    Input(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Input(_) => ErrorKind::Input,
            AppError::Extraction(ExtractError::DocumentNotFound(_)) => ErrorKind::Input,
            AppError::Extraction(_) => ErrorKind::Decode,
            AppError::Storage(StorageError::TableNotFound(_))
            | AppError::Storage(StorageError::Unparsable { .. }) => ErrorKind::Read,
            AppError::Io(_)
            | AppError::Storage(_)
            | AppError::Processing(_) => ErrorKind::Internal,
        }
    }
}
