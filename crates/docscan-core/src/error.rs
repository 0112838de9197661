// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docscan.

use thiserror::Error;

/// Top-level error type for all scanning operations.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Input errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    // -- Pipeline outcomes --
    /// No ranked contour approximated to exactly four vertices. This is an
    /// expected outcome for photos without a clear page outline.
    #[error("no document outline found ({candidates} candidate contours examined)")]
    DocumentNotFound { candidates: usize },

    #[error("degenerate document geometry: {0}")]
    DegenerateGeometry(String),

    // -- Collaborators --
    #[error("OCR failed: {0}")]
    Ocr(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanError {
    /// Whether the error is an expected, recoverable pipeline outcome rather
    /// than a malfunction.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScanError::DocumentNotFound { .. })
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_not_found_is_recoverable() {
        let err = ScanError::DocumentNotFound { candidates: 3 };
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("3 candidate"));
    }

    #[test]
    fn decode_is_not_recoverable() {
        assert!(!ScanError::Decode("truncated".into()).is_recoverable());
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ScanError = io.into();
        assert!(matches!(err, ScanError::Io(_)));
    }
}
