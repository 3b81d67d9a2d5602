/*!
 * Error types for the polint application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Configuration errors: a caller asked for something that is not in a
/// catalogue. These are detected eagerly, before any entry is processed,
/// and abort the whole run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An unknown variable format name was requested
    #[error("\"{0}\" is not a known variable format")]
    UnknownFormat(String),

    /// An unknown pipeline transform name was requested
    #[error("\"{0}\" is not a known pipeline transform")]
    UnknownTransform(String),

    /// An unknown lint rule name or code was requested
    #[error("\"{0}\" is not a known lint rule")]
    UnknownRule(String),

    /// A suppression directive named a code that no rule emits
    #[error("unknown rule code \"{code}\" in ignore directive on entry at line {line}")]
    UnknownSuppressedCode {
        /// The unrecognized code
        code: String,
        /// Line number of the offending entry
        line: usize,
    },
}

/// Errors raised while segmenting markup in the HTML-aware stage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// A tag was opened but never closed with '>'
    #[error("unterminated tag starting at byte {0}")]
    UnterminatedTag(usize),

    /// A comment was opened but never closed with '-->'
    #[error("unterminated comment starting at byte {0}")]
    UnterminatedComment(usize),

    /// A quoted attribute value was never closed
    #[error("unterminated attribute value starting at byte {0}")]
    UnterminatedAttribute(usize),
}

/// Errors that can occur while parsing a PO catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A line could not be interpreted as part of a PO entry
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-based line number in the catalog source
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Error from a file operation
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Shorthand for a syntax error at a given line
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        CatalogError::Syntax {
            line,
            message: message.into(),
        }
    }
}
