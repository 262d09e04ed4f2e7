//! Error types.
//!
//! Two families: [`Error`] for I/O, parsing and configuration failures at the
//! crate boundary, and [`EditRejection`] for operation-editor input that must
//! be corrected before a save goes through.

use thiserror::Error;

use crate::models::OperationId;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Boundary errors (storage, files, configuration, parsing).
#[derive(Error, Debug)]
pub enum Error {
    /// File or directory access failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot payload is not usable at all (not a JSON object).
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A textual value did not name a known variant.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A static asset could not be fetched.
    #[error("Asset unavailable: {0}")]
    AssetUnavailable(String),
}

/// Reasons the operation editor refuses to save.
///
/// State is left untouched; the caller keeps the editor open and focuses
/// the offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditRejection {
    /// `code` is empty after trimming.
    #[error("code must not be blank")]
    BlankCode,

    /// `title` is empty after trimming.
    #[error("title must not be blank")]
    BlankTitle,

    /// The edited operation is not in the catalog.
    #[error("unknown operation: {0}")]
    UnknownOperation(OperationId),
}
