//! Error types for pdfbatch.

use std::io;
use thiserror::Error;

/// Result type alias for pdfbatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting and reporting.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error extracting images from PDF.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Error serializing a result to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing the CSV report.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A metadata key the report relies on is absent.
    #[error("Missing metadata key: {0}")]
    MissingMetadata(String),

    /// The folder path could not be turned into a file pattern.
    #[error("Invalid file pattern: {0}")]
    InvalidPattern(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<glob::PatternError> for Error {
    fn from(err: glob::PatternError) -> Self {
        Error::InvalidPattern(err.to_string())
    }
}

impl From<glob::GlobError> for Error {
    fn from(err: glob::GlobError) -> Self {
        Error::Io(err.into())
    }
}
