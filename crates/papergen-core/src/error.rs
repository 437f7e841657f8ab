//! Error types for paper compilation.
//!
//! A render either completes with a full document buffer or fails with a
//! [`PapergenError`] carrying the underlying cause; partially written output
//! is never returned. A missing asset is deliberately *not* an error — the
//! compiler degrades by skipping the visual element.

use thiserror::Error;

/// Error conditions raised while compiling a paper into a document package.
#[derive(Error, Debug)]
pub enum PapergenError {
    /// Unexpected fault while assembling the document from a paper.
    ///
    /// Covers malformed tree shapes the compiler cannot recurse into and any
    /// other render-time fault that is not more specifically classified.
    #[error("Render error: {0}")]
    Render(String),

    /// File I/O error, e.g. while reading an asset from the store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error for the editor's document
    /// format or the paper records.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An asset resolved to bytes that do not decode as a supported image.
    ///
    /// Distinct from a missing asset: the missing case is a designed skip,
    /// while undecodable bytes are a malformed input and propagate.
    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    /// Container or markup serialization error from the package writer.
    #[error("Package error: {0}")]
    Package(#[from] anyhow::Error),
}

/// Type alias for [`Result<T, PapergenError>`].
pub type Result<T> = std::result::Result<T, PapergenError>;
