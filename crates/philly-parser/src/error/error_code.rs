//! Error codes for the Philly diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Leaf builder errors
//! - `E2xx` - Structural validation errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unexpected character.
    ///
    /// No grammar rule matches at this position.
    E001,

    // =========================================================================
    // Leaf Builder Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// An operand appeared where a construct tag was expected, or a tag
    /// appeared where an operand was expected.
    E100,

    /// Incomplete input.
    ///
    /// The token stream ended before a construct received all of its
    /// operands.
    E101,

    // =========================================================================
    // Validation Errors (E2xx)
    // =========================================================================
    /// Unbalanced close.
    ///
    /// A `}` or `)` has no matching opener, or closes the wrong kind of
    /// opener.
    E200,

    /// Unclosed construct.
    ///
    /// A class, function, block, argument list, or parenthesis is still open
    /// at the end of the program.
    E201,

    /// Orphan condition.
    ///
    /// A condition continuation (`x === 1) {`, `maybe) {`) does not directly
    /// follow `if (`.
    E202,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unexpected character",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E200 => "unbalanced close",
            ErrorCode::E201 => "unclosed construct",
            ErrorCode::E202 => "orphan condition",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
