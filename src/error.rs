// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Folio

use thiserror::Error;

/// Result type alias for Folio operations
pub type Result<T> = std::result::Result<T, FolioError>;

/// Folio error types
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Model invocation failed: {0}")]
    Invocation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Alternate data streams are not supported on this platform")]
    StreamUnsupported,
}
