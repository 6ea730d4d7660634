//! Structural validation for leaf sequences.
//!
//! Leaves are flat, so nothing in the leaf builder checks that a class body,
//! function body, block or argument list is ever closed. The [`Validator`]
//! walks the sequence once with a stack of open constructs and checks:
//!
//! - **Balanced closes**: every `}`, `)` and `]` closes the innermost open
//!   construct of the matching kind
//! - **Nothing left open**: the stack is empty at the end of the program
//! - **Condition continuations**: `x === 1) {`, `maybe) {` and friends
//!   directly follow `if (` (spaces in between are allowed)
//!
//! Validation is opt-in (see [`ParseConfig::strict`](crate::ParseConfig)).

use philly_core::Leaf;

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    span::{Span, Spanned},
};

/// Kind of bracket a construct leaves open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bracket {
    Curly,
    Parenth,
    Square,
}

impl Bracket {
    fn close(self) -> char {
        match self {
            Bracket::Curly => '}',
            Bracket::Parenth => ')',
            Bracket::Square => ']',
        }
    }
}

/// A construct waiting for its close.
#[derive(Debug, Clone, Copy)]
struct Opener {
    bracket: Bracket,
    tag: &'static str,
    span: Span,
}

/// Single-pass structural validator.
pub struct Validator {
    open: Vec<Opener>,
    previous: Option<Spanned<&'static str>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            open: Vec::new(),
            previous: None,
        }
    }

    fn push(&mut self, bracket: Bracket, leaf: &Spanned<Leaf>) {
        self.open.push(Opener {
            bracket,
            tag: leaf.tag_name(),
            span: leaf.span(),
        });
    }

    /// Pop the innermost opener, which must be of kind `bracket`.
    fn close(&mut self, bracket: Bracket, leaf: &Spanned<Leaf>) -> Result<()> {
        match self.open.pop() {
            Some(opener) if opener.bracket == bracket => Ok(()),
            Some(opener) => Err(Diagnostic::error(format!(
                "`{}` does not close the {} opened here",
                bracket.close(),
                opener.tag
            ))
            .with_code(ErrorCode::E200)
            .with_label(leaf.span(), ErrorCode::E200.description())
            .with_secondary_label(
                opener.span,
                format!("expects `{}`", opener.bracket.close()),
            )
            .with_help("close constructs in the reverse order they were opened")),
            None => Err(Diagnostic::error(format!("`{}` closes nothing", bracket.close()))
                .with_code(ErrorCode::E200)
                .with_label(leaf.span(), ErrorCode::E200.description())
                .with_help(format!(
                    "remove the `{}` or open a construct before it",
                    bracket.close()
                ))),
        }
    }

    /// A condition continuation must directly follow `if (`.
    fn check_continuation(&self, leaf: &Spanned<Leaf>) -> Result<()> {
        match &self.previous {
            Some(previous) if **previous == "COND_INIT" => Ok(()),
            _ => {
                let mut diag = Diagnostic::error(format!(
                    "{} must directly follow `if (`",
                    leaf.tag_name()
                ))
                .with_code(ErrorCode::E202)
                .with_label(leaf.span(), ErrorCode::E202.description());
                if let Some(previous) = &self.previous {
                    diag = diag
                        .with_secondary_label(previous.span(), format!("preceded by {previous}"));
                }
                Err(diag.with_help("start the condition with `if (`"))
            }
        }
    }

    /// Check one leaf against the open-construct stack.
    pub fn visit_leaf(&mut self, leaf: &Spanned<Leaf>) -> Result<()> {
        match leaf.inner() {
            Leaf::Class { .. }
            | Leaf::ClassExtension { .. }
            | Leaf::FunctionNoParam { .. }
            | Leaf::CondElse
            | Leaf::OpenCurly => self.push(Bracket::Curly, leaf),
            Leaf::Method { .. } | Leaf::OpenParenth | Leaf::CondInit => {
                self.push(Bracket::Parenth, leaf)
            }
            Leaf::OpenBracket => self.push(Bracket::Square, leaf),
            Leaf::CloseCurly => self.close(Bracket::Curly, leaf)?,
            Leaf::CloseParenth => self.close(Bracket::Parenth, leaf)?,
            Leaf::CloseBracket => self.close(Bracket::Square, leaf)?,
            continuation if continuation.continues_condition() => {
                // Closes the `(` of `if (` and opens the block.
                self.check_continuation(leaf)?;
                self.close(Bracket::Parenth, leaf)?;
                self.push(Bracket::Curly, leaf);
            }
            _ => {}
        }

        if !matches!(leaf.inner(), Leaf::Space) {
            self.previous = Some(Spanned::new(leaf.tag_name(), leaf.span()));
        }
        Ok(())
    }

    /// Report the outermost construct that is still open.
    pub fn finish(self) -> Result<()> {
        match self.open.first() {
            None => Ok(()),
            Some(opener) => Err(Diagnostic::error(format!(
                "{} is never closed",
                opener.tag
            ))
            .with_code(ErrorCode::E201)
            .with_label(opener.span, ErrorCode::E201.description())
            .with_help(format!(
                "add a matching `{}` ({} construct(s) still open)",
                opener.bracket.close(),
                self.open.len()
            ))),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run structural validation over a leaf sequence.
///
/// Returns the first problem found, in source order.
pub fn validate_leaves(leaves: &[Spanned<Leaf>]) -> Result<()> {
    let mut validator = Validator::new();
    for leaf in leaves {
        validator.visit_leaf(leaf)?;
    }
    validator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, parser::build_leaves};

    fn validate(source: &str) -> Result<()> {
        let tokens = tokenize(source).expect("Failed to tokenize input");
        let leaves = build_leaves(&tokens).expect("Failed to build leaves");
        validate_leaves(&leaves)
    }

    fn error_code(source: &str) -> Option<ErrorCode> {
        validate(source).expect_err("validation should fail").code()
    }

    #[test]
    fn test_balanced_program() {
        let source = "boul Dog {\n  fun bark {\n    console.log(\"woof\")\n  }\n}\n\
                      if (x === 1, 2) {\n  maybeRun()\n} else {\n}\n";
        assert!(validate(source).is_ok());
    }

    #[test]
    fn test_flat_statements_need_no_closing() {
        assert!(validate("jawn x := 1\nx /% 3\n5!").is_ok());
    }

    #[test]
    fn test_close_with_nothing_open() {
        let err = validate("jawn x := 1\n}").unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E200));
        assert_eq!(err.message(), "`}` closes nothing");
        assert_eq!(err.labels()[0].span(), Span::new(12..13));
    }

    #[test]
    fn test_close_of_wrong_kind() {
        let err = validate("fun main {\n  console.log(x}\n)").unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E200));
        assert_eq!(err.message(), "`}` does not close the METHOD opened here");
        assert_eq!(err.labels().len(), 2);
    }

    #[test]
    fn test_square_brackets_nest_with_calls() {
        assert!(validate("console.log([xs[0], this.name])").is_ok());

        let err = validate("console.log([1, 2)]").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E200));
        assert_eq!(err.message(), "`)` does not close the OPEN_BRACKET opened here");

        assert_eq!(error_code("jawn xs := 1
xs[0"), Some(ErrorCode::E201));
    }

    #[test]
    fn test_unclosed_construct_reports_outermost() {
        let err = validate("boul Dog {\n  fun bark {\n").unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E201));
        assert_eq!(err.message(), "CLASS is never closed");
        assert_eq!(err.labels()[0].span(), Span::new(0..10));
    }

    #[test]
    fn test_condition_continuation_after_cond_init() {
        assert!(validate("if (maybe) {\n}").is_ok());
        assert!(validate("if ( x < 1, > 9) {\n}").is_ok());
    }

    #[test]
    fn test_orphan_condition() {
        assert_eq!(error_code("maybe) {\n}"), Some(ErrorCode::E202));

        let err = validate("jawn x := 1\nx === 1) {\n}").unwrap_err();
        assert_eq!(err.message(), "COND_MANY_SINGLE_OPERATOR must directly follow `if (`");
        assert_eq!(err.labels().len(), 2);
    }
}
