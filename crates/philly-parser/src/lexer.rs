//! Lexical analyzer for PhillyScript source text.
//!
//! The lexer scans the source left to right. At every position each grammar
//! rule from the [`rules`](crate::rules) table is tried; the longest
//! non-empty match wins, with ties going to the rule listed first. The
//! winning rule emits its [`Tag`] followed by one operand per capture group.
//! When the input is exhausted a single [`Tag::Eof`] is appended.
//!
//! The public entry point is [`tokenize`]. Lexing is fail-fast: the first
//! position no rule matches aborts with an [`ErrorCode::E001`] diagnostic.

use log::{debug, trace};
use regex::Captures;

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    rules::{Rule, rules},
    span::Span,
    tokens::{PositionedToken, Tag, Token},
};

/// Position of the scanner within the source.
///
/// Rows and columns are 1-based and counted in characters. A newline
/// advances the row and resets the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScanState {
    offset: usize,
    row: usize,
    column: usize,
}

impl ScanState {
    fn start() -> Self {
        Self {
            offset: 0,
            row: 1,
            column: 1,
        }
    }

    /// State after consuming `lexeme`.
    fn advance(self, lexeme: &str) -> Self {
        lexeme.chars().fold(
            Self {
                offset: self.offset + lexeme.len(),
                ..self
            },
            |state, c| {
                if c == '\n' {
                    Self {
                        row: state.row + 1,
                        column: 1,
                        ..state
                    }
                } else {
                    Self {
                        column: state.column + 1,
                        ..state
                    }
                }
            },
        )
    }
}

/// The winning rule at a scan position.
struct Match<'src> {
    rule: &'static Rule,
    captures: Captures<'src>,
    len: usize,
}

/// Pick the longest match among all rules; earlier rules win ties.
fn longest_match(rest: &str) -> Option<Match<'_>> {
    let mut best: Option<Match<'_>> = None;

    for rule in rules() {
        let Some(captures) = rule.captures(rest) else {
            continue;
        };
        let len = captures.get(0).map_or(0, |m| m.end());
        if len == 0 {
            continue;
        }
        if best.as_ref().is_none_or(|best| len > best.len) {
            best = Some(Match {
                rule,
                captures,
                len,
            });
        }
    }

    best
}

/// Lexer that accumulates tokens while scanning.
struct Lexer<'src> {
    source: &'src str,
    tokens: Vec<PositionedToken<'src>>,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
        }
    }

    /// Scan the whole source, appending the end-of-input marker.
    fn tokenize(mut self) -> Result<Vec<PositionedToken<'src>>, ParseError> {
        let mut state = ScanState::start();

        while state.offset < self.source.len() {
            state = self.scan(state)?;
        }

        let end = Span::new(state.offset..state.offset);
        self.tokens
            .push(PositionedToken::new(Token::Tag(Tag::Eof), end));
        Ok(self.tokens)
    }

    /// Emit the tokens for the rule matching at `state` and return the state
    /// after its lexeme.
    fn scan(&mut self, state: ScanState) -> Result<ScanState, ParseError> {
        let source = self.source;
        let rest = &source[state.offset..];
        let Some(Match {
            rule,
            captures,
            len,
        }) = longest_match(rest)
        else {
            return Err(Self::unexpected_character(rest, state).into());
        };

        let tag = rule.tag(&captures);
        let lexeme_span = Span::new(state.offset..state.offset + len);
        trace!(
            rule = rule.name(),
            row = state.row,
            column = state.column;
            "Matched grammar rule"
        );
        self.tokens
            .push(PositionedToken::new(Token::Tag(tag), lexeme_span));

        for group in rule.operands() {
            let token = match captures.name(group) {
                Some(m) => PositionedToken::new(
                    Token::Operand(m.as_str()),
                    Span::new(state.offset + m.start()..state.offset + m.end()),
                ),
                None => PositionedToken::new(
                    Token::Operand(""),
                    Span::new(lexeme_span.end()..lexeme_span.end()),
                ),
            };
            self.tokens.push(token);
        }

        Ok(state.advance(&rest[..len]))
    }

    fn unexpected_character(rest: &str, state: ScanState) -> Diagnostic {
        let ch = rest.chars().next().unwrap_or_default();
        let span = Span::new(state.offset..state.offset + ch.len_utf8());

        Diagnostic::error(format!(
            "unexpected character `{}` at row {}, column {}",
            ch.escape_debug(),
            state.row,
            state.column
        ))
        .with_code(ErrorCode::E001)
        .with_label(span, ErrorCode::E001.description())
        .with_help("no construct starts here; quote it inside a string literal if it is text")
    }
}

/// Tokenize PhillyScript source into a flat token stream.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying an [`ErrorCode::E001`] diagnostic when
/// no grammar rule matches at some position.
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    debug!(tokens = tokens.len(); "Tokenized source");
    Ok(tokens)
}


#[cfg(test)]
pub(crate) mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    /// Strategy for short lines built from valid PhillyScript fragments.
    pub(crate) fn fragment_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                Just("jawn x := 1".to_string()),
                Just("if (x === 1, 2) {".to_string()),
                Just("}".to_string()),
                Just("console.log(\"hi\")".to_string()),
                Just("5!".to_string()),
                Just("a ~= b".to_string()),
                Just(r#"if (name === "a,b") {"#.to_string()),
                Just(r"this.name = 'it\'s'".to_string()),
                Just("xs[0] + Math.PI".to_string()),
                "[a-z][a-z0-9]{0,8}",
                "[0-9]{1,4}",
            ],
            0..8,
        )
        .prop_map(|parts| parts.join("\n"))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Tokenizing the same source twice yields the same stream.
    fn check_tokenize_is_deterministic(source: &str) -> Result<(), TestCaseError> {
        let first = tokenize(source).map_err(|err| TestCaseError::fail(err.to_string()))?;
        let second = tokenize(source).map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(first, second);
        Ok(())
    }

    /// Tag spans tile the source with no gaps and end with a single EOF.
    fn check_tag_spans_cover_source(source: &str) -> Result<(), TestCaseError> {
        let tokens = tokenize(source).map_err(|err| TestCaseError::fail(err.to_string()))?;
        let mut expected_start = 0;
        let mut eof_count = 0;

        for token in &tokens {
            if let Token::Tag(tag) = token.token {
                prop_assert_eq!(token.span.start(), expected_start);
                expected_start = token.span.end();
                if tag == Tag::Eof {
                    eof_count += 1;
                }
            }
        }

        prop_assert_eq!(expected_start, source.len());
        prop_assert_eq!(eof_count, 1);
        prop_assert_eq!(tokens.last().map(|t| t.token), Some(Token::Tag(Tag::Eof)));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn tokenize_is_deterministic(source in fragment_strategy()) {
            check_tokenize_is_deterministic(&source)?;
        }

        #[test]
        fn tag_spans_cover_source(source in fragment_strategy()) {
            check_tag_spans_cover_source(&source)?;
        }
    }
}
