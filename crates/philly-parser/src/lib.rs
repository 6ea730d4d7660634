//! # Philly Parser
//!
//! Front end for the PhillyScript language. This crate turns source text
//! into the flat leaf sequence consumed by the generator.
//!
//! ## Usage
//!
//! ```
//! # use philly_parser::{parse, ParseConfig, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let program = parse("jawn x := 1", ParseConfig::default())?;
//!     assert_eq!(program.len(), 1);
//!     Ok(())
//! }
//! ```

pub mod error;
mod lexer;
mod parser;
mod rules;
mod span;
pub mod tokens;
mod validate;

pub use lexer::tokenize;
pub use parser::build_leaves;
pub use span::{Span, Spanned};
pub use validate::{Validator, validate_leaves};

use log::info;

use philly_core::Program;

use error::ParseError;
use tokens::PositionedToken;

/// Configuration for the parsing pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseConfig {
    /// Run structural validation (balanced brackets, condition
    /// continuations) after building leaves.
    pub strict: bool,
}

impl ParseConfig {
    /// Create a config with strict validation on or off.
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }
}

/// Build a program from an already tokenized stream.
///
/// Runs the leaf builder and, when `config.strict` is set, structural
/// validation.
///
/// # Errors
///
/// Returns a [`ParseError`] for the first leaf builder or validation
/// problem found.
pub fn parse_tokens(
    tokens: &[PositionedToken<'_>],
    config: ParseConfig,
) -> Result<Program, ParseError> {
    let leaves = build_leaves(tokens)?;

    if config.strict {
        validate_leaves(&leaves)?;
    }

    Ok(leaves.into_iter().map(Spanned::into_inner).collect())
}

/// Parse source text into a program.
///
/// This is the main entry point for the front end. It runs the pipeline:
///
/// 1. **Tokenize** - Convert source text to a flat token stream
/// 2. **Build** - Turn each tag and its operands into one leaf
/// 3. **Validate** - Check bracket balance and conditions (strict mode only)
///
/// # Example
///
/// ```
/// # use philly_parser::{parse, ParseConfig, error::ParseError};
///
/// fn main() -> Result<(), ParseError> {
///     let program = parse("if (maybe) {\n}", ParseConfig::new(true))?;
///     assert_eq!(program.len(), 4);
///     Ok(())
/// }
/// ```
pub fn parse(source: &str, config: ParseConfig) -> Result<Program, ParseError> {
    info!(strict = config.strict; "Parsing source");

    // Step 1: Tokenize
    let tokens = tokenize(source)?;

    // Steps 2 and 3: Build and validate
    parse_tokens(&tokens, config)
}
