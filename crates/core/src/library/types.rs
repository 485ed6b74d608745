//! Types for the legacy library catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One file in the legacy library.
///
/// Opaque to the core beyond the raw filename and an optional year; the
/// normalizer turns the filename into something comparable on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Raw filename as it appears in the library.
    pub filename: String,
    /// Release year, when the library knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Errors for library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(String),
}
