//! Error types for editor operations.
//!
//! Editing operations themselves never fail: a missing section or a
//! degenerate request is an identity no-op. These errors cover the
//! checked surfaces around them (geometry construction, tiling
//! verification, configuration and JSON exchange).

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur around the editing engine.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Section not found in the layout.
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// A rectangle with non-positive or non-finite extent.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Sections no longer tile the canvas exactly.
    #[error("Tiling violation: {0}")]
    TilingViolation(String),

    /// Layout or event serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rejected configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
