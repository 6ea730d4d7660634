//! Error and diagnostic system for the Philly front end.
//!
//! The error system is built around the [`Diagnostic`] type, which carries
//! an error code, labeled source spans, and help text. Diagnostics are
//! wrapped in [`ParseError`] for returning from the pipeline. Compilation
//! is fail-fast: the first diagnostic aborts the run.
//!
//! # Example
//!
//! ```
//! # use philly_parser::error::{Diagnostic, ErrorCode};
//! # use philly_parser::Span;
//!
//! let diag = Diagnostic::error("`}` closes nothing")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(20..21), "unbalanced close")
//!     .with_help("remove the `}` or open a block before it");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
