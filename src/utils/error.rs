// src/utils/error.rs
use thiserror::Error;

// Error types are layered per concern; AppError aggregates them for main.

#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("SEC rate limit likely exceeded")]
    RateLimited,

    #[error("Could not find filing container: {0}")]
    FilingNotFound(String),

    #[error("Failed to parse EDGAR response: {0}")]
    Parse(String),
}

/// Structural problems in a filing container. These abort the current
/// filing; classification negatives (a section that simply is not HTML)
/// are not errors and never appear here.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("document section has no <{0}> header line")]
    MissingField(&'static str),

    #[error("malformed document section: {0}")]
    MalformedSection(String),

    #[error("section '{0}' declares an HTML file name but wraps an XBRL document")]
    MisclassifiedXbrl(String),

    #[error("anchor opened at byte {0} is never closed")]
    UnterminatedAnchor(usize),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
