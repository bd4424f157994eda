/*!
 * Error types for the subscout application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when resolving a language
#[derive(Error, Debug)]
pub enum LanguageError {
    /// No catalog record matched the queried value under any enabled lookup system
    #[error("not a language: {0:?}")]
    NotALanguage(String),

    /// Content-based detection was requested but the guessing capability is absent.
    ///
    /// Distinguishable from a plain [`LanguageError::NotALanguage`] so a caller
    /// can hide the detection feature instead of surfacing a generic failure.
    #[error("language detection unsupported: {0}")]
    DetectionUnsupported(String),
}

/// Errors that can occur when starting a folder scan.
///
/// Only invalid-argument class failures abort a scan, and only before any
/// progress-reporter activity; per-file I/O issues are logged and skipped.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The scan root is not a directory
    #[error("scan root is not a directory: {0:?}")]
    NotADirectory(PathBuf),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from language resolution
    #[error("Language error: {0}")]
    Language(#[from] LanguageError),

    /// Error from a folder scan
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
