//! Common error types for the annotation tool

use thiserror::Error;

/// Common result type for annotation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the annotation core
///
/// None of these are fatal to a running session: each boundary operation
/// either commits fully or leaves the session exactly as it was.
#[derive(Error, Debug)]
pub enum Error {
    /// Selected file does not carry the `.xlsx` extension
    #[error("Please select an Excel (.xlsx) file: {0}")]
    InvalidFileType(String),

    /// Workbook could not be read or parsed
    #[error("Error loading file: {0}")]
    FileRead(String),

    /// Workbook parsed but produced no rows
    #[error("No data found in file")]
    EmptyInput,

    /// Save attempted with no bucket checked
    #[error("Please select at least one bucket")]
    NoBucketSelected,

    /// Download attempted before anything was annotated
    #[error("No annotations to download")]
    NothingToExport,

    /// No conversations are loaded
    #[error("No conversations loaded")]
    NoConversations,

    /// Conversation id not present in the current session
    #[error("Unknown conversation: {0}")]
    UnknownConversation(String),

    /// Output workbook could not be generated
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::XlsxError> for Error {
    fn from(err: calamine::XlsxError) -> Self {
        Error::FileRead(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Spreadsheet(err.to_string())
    }
}
