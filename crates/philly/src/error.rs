//! Error types for Philly operations.
//!
//! This module provides the main error type [`PhillyError`] which wraps
//! the error conditions that can occur while transpiling.

use std::io;

use thiserror::Error;

use philly_parser::error::ParseError;

/// The main error type for Philly operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the diagnostics so
/// callers can render labeled snippets.
#[derive(Debug, Error)]
pub enum PhillyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{err}")]
    Parse { err: ParseError, src: String },
}

impl PhillyError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
