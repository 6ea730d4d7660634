//! Leaf builder for PhillyScript token streams.
//!
//! This module walks the flat token stream produced by the
//! [`lexer`](super::lexer) and turns every construct tag, together with the
//! operand tokens that directly follow it, into one [`Leaf`]. The public
//! entry point is [`build_leaves`].

use std::str::FromStr;

use log::debug;
use winnow::{
    Parser as _,
    combinator::repeat,
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use philly_core::{
    Leaf,
    leaf::{Comparison, Delimiter, Magnitude, Shift},
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    rules::condition_values,
    span::{Span, Spanned},
    tokens::{PositionedToken, Tag, Token},
};

/// Context type for leaf builder errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what was expected at the error position
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) where the failing construct starts
    ///
    /// Used to calculate the construct index as: `tokens.len() - start_offset_value`
    StartOffset(usize),
}

type Input<'src> = PhillyTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type PhillyTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

const CONSTRUCT_TAG: &str = "construct tag";
const NOTHING_AFTER_EOF: &str = "nothing after the end of input";

/// Turn an error inside a construct into a Cut error that remembers where
/// the construct started.
fn commit(
    start_remaining: usize,
    error: ErrMode<ContextError<Context>>,
) -> ErrMode<ContextError<Context>> {
    match error {
        ErrMode::Backtrack(mut e) | ErrMode::Cut(mut e) => {
            e.push(Context::StartOffset(start_remaining));
            ErrMode::Cut(e)
        }
        e => e,
    }
}

/// Parse the tag that opens a construct
fn construct_tag<'src>(input: &mut Input<'src>) -> IResult<Spanned<Tag>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Tag(tag) if tag != Tag::Eof => Some(Spanned::new(tag, token.span)),
        _ => None,
    })
    .context(Context::Label(CONSTRUCT_TAG))
    .parse_next(input)
}

/// Parse the end-of-input marker
fn end_of_input<'src>(input: &mut Input<'src>) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Tag(Tag::Eof) => Some(token.span),
        _ => None,
    })
    .context(Context::Label(CONSTRUCT_TAG))
    .parse_next(input)
}

/// Parse a raw operand value with span preservation
fn operand<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Operand(value) => Some(Spanned::new(value, token.span)),
        Token::Tag(_) => None,
    })
    .context(Context::Label("operand"))
    .parse_next(input)
}

/// Parse one operand and widen the construct span over it
fn text_operand<'src>(input: &mut Input<'src>, span: &mut Span) -> IResult<&'src str> {
    let value = operand.parse_next(input)?;
    *span = span.union(value.span());
    Ok(value.into_inner())
}

/// Parse exactly `N` operands
fn operands<'src, const N: usize>(
    input: &mut Input<'src>,
    span: &mut Span,
) -> IResult<[&'src str; N]> {
    let mut values = [""; N];
    for value in &mut values {
        *value = text_operand(input, span)?;
    }
    Ok(values)
}

/// Parse an operand that names a member of a closed set
fn typed_operand<'src, T: FromStr>(
    input: &mut Input<'src>,
    span: &mut Span,
    label: &'static str,
) -> IResult<T> {
    let value = any
        .verify_map(|token: &PositionedToken<'src>| match token.token {
            Token::Operand(value) => value
                .parse::<T>()
                .ok()
                .map(|typed| Spanned::new(typed, token.span)),
            Token::Tag(_) => None,
        })
        .context(Context::Label(label))
        .parse_next(input)?;
    *span = span.union(value.span());
    Ok(value.into_inner())
}

/// Split a condition value list: `1, "a,b"` → `["1", "\"a,b\""]`
fn condition_params(params: &str) -> Vec<String> {
    condition_values(params).map(String::from).collect()
}

/// Read the operands of `tag` and package them into a leaf
fn leaf_body<'src>(
    tag: Tag,
    mut span: Span,
    input: &mut Input<'src>,
) -> IResult<Spanned<Leaf>> {
    let leaf = match tag {
        Tag::Eof => unreachable!("end of input never opens a construct"),
        Tag::Newline => Leaf::Newline,
        Tag::Space => Leaf::Space,
        Tag::CloseCurly => Leaf::CloseCurly,
        Tag::CloseParenth => Leaf::CloseParenth,
        Tag::OpenCurly => Leaf::OpenCurly,
        Tag::OpenParenth => Leaf::OpenParenth,
        Tag::OpenBracket => Leaf::OpenBracket,
        Tag::CloseBracket => Leaf::CloseBracket,
        Tag::CondInit => Leaf::CondInit,
        Tag::CondElse => Leaf::CondElse,
        Tag::NotEqual => Leaf::NotEqual,
        Tag::Maybe => Leaf::Maybe,
        Tag::Comma => Leaf::Comma,

        Tag::Class => {
            let [name] = operands(input, &mut span)?;
            Leaf::Class {
                name: name.to_string(),
            }
        }
        Tag::ClassExtension => {
            let [name, parent] = operands(input, &mut span)?;
            Leaf::ClassExtension {
                name: name.to_string(),
                parent: parent.to_string(),
            }
        }
        Tag::ClassInstantiation => {
            let [var, class] = operands(input, &mut span)?;
            Leaf::ClassInstantiation {
                var: var.to_string(),
                class: class.to_string(),
            }
        }
        Tag::FunctionNoParam { deferred } => {
            let [name] = operands(input, &mut span)?;
            Leaf::FunctionNoParam {
                name: name.to_string(),
                deferred,
            }
        }
        Tag::Method { deferred } => {
            let [callee, method] = operands(input, &mut span)?;
            Leaf::Method {
                callee: callee.to_string(),
                method: method.to_string(),
                deferred,
            }
        }
        Tag::Return => {
            let [val] = operands(input, &mut span)?;
            Leaf::Return {
                val: val.to_string(),
            }
        }
        Tag::InstanceOf => {
            let [var, class] = operands(input, &mut span)?;
            Leaf::InstanceOf {
                var: var.to_string(),
                class: class.to_string(),
            }
        }
        Tag::Var { deferred } => {
            let [var, val] = operands(input, &mut span)?;
            Leaf::Var {
                var: var.to_string(),
                val: val.to_string(),
                deferred,
            }
        }
        Tag::VarMut { deferred } => {
            let [var, val] = operands(input, &mut span)?;
            Leaf::VarMut {
                var: var.to_string(),
                val: val.to_string(),
                deferred,
            }
        }
        Tag::VarCall => {
            let [var] = operands(input, &mut span)?;
            Leaf::VarCall {
                var: var.to_string(),
            }
        }
        Tag::ClassCall => {
            let [class] = operands(input, &mut span)?;
            Leaf::ClassCall {
                class: class.to_string(),
            }
        }
        Tag::MemberAccess => {
            let [member] = operands(input, &mut span)?;
            Leaf::MemberAccess {
                member: member.to_string(),
            }
        }
        Tag::CondManySingleOperator => {
            let [var, operator, params] = operands(input, &mut span)?;
            Leaf::CondManySingleOperator {
                var: var.to_string(),
                operator: operator.to_string(),
                params: condition_params(params),
            }
        }
        Tag::CondManyManyOperator => {
            let [var, first_operator, first_val, second_operator, second_val] =
                operands(input, &mut span)?;
            Leaf::CondManyManyOperator {
                var: var.to_string(),
                first: Comparison {
                    operator: first_operator.to_string(),
                    val: first_val.trim().to_string(),
                },
                second: Comparison {
                    operator: second_operator.to_string(),
                    val: second_val.trim().to_string(),
                },
            }
        }
        Tag::StaticString => {
            let delimiter: Delimiter = typed_operand(input, &mut span, "string delimiter")?;
            let [val] = operands(input, &mut span)?;
            Leaf::StaticString {
                delimiter,
                val: val.to_string(),
            }
        }
        Tag::AtomInstantiation => {
            let [var, atom] = operands(input, &mut span)?;
            Leaf::AtomInstantiation {
                var: var.to_string(),
                atom: atom.to_string(),
            }
        }
        Tag::AtomPrint => {
            let [atom] = operands(input, &mut span)?;
            Leaf::AtomPrint {
                atom: atom.to_string(),
            }
        }
        Tag::Range => {
            let [var, start, end] = operands(input, &mut span)?;
            Leaf::Range {
                var: var.to_string(),
                start: start.to_string(),
                end: end.to_string(),
            }
        }
        Tag::ArrayArithmetic => {
            let [var, operator, val] = operands(input, &mut span)?;
            Leaf::ArrayArithmetic {
                var: var.to_string(),
                operator: operator.to_string(),
                val: val.to_string(),
            }
        }
        Tag::Estimate => {
            let [lhs, rhs] = operands(input, &mut span)?;
            Leaf::Estimate {
                lhs: lhs.to_string(),
                rhs: rhs.to_string(),
            }
        }
        Tag::EstimatePrecise => {
            let [lhs, precision, rhs] = operands(input, &mut span)?;
            Leaf::EstimatePrecise {
                lhs: lhs.to_string(),
                rhs: rhs.to_string(),
                precision: precision.to_string(),
            }
        }
        Tag::DivRemain => {
            let [var, val] = operands(input, &mut span)?;
            Leaf::DivRemain {
                var: var.to_string(),
                val: val.to_string(),
            }
        }
        Tag::Factorial => {
            let [val] = operands(input, &mut span)?;
            Leaf::Factorial {
                val: val.to_string(),
            }
        }
        Tag::MaybeWeighted => {
            let [probability] = operands(input, &mut span)?;
            Leaf::MaybeWeighted {
                probability: probability.to_string(),
            }
        }
        Tag::Magnitude => {
            let [lhs] = operands(input, &mut span)?;
            let direction: Magnitude = typed_operand(input, &mut span, "`>>` or `<<`")?;
            let [rhs] = operands(input, &mut span)?;
            Leaf::Magnitude {
                lhs: lhs.to_string(),
                direction,
                rhs: rhs.to_string(),
            }
        }
        Tag::MagnitudePrecise => {
            let [lhs] = operands(input, &mut span)?;
            let direction: Magnitude = typed_operand(input, &mut span, "`>>` or `<<`")?;
            let [factor, rhs] = operands(input, &mut span)?;
            Leaf::MagnitudePrecise {
                lhs: lhs.to_string(),
                direction,
                factor: factor.to_string(),
                rhs: rhs.to_string(),
            }
        }
        Tag::Bitshift => {
            let [lhs] = operands(input, &mut span)?;
            let direction: Shift = typed_operand(input, &mut span, "`shl` or `shr`")?;
            let [rhs] = operands(input, &mut span)?;
            Leaf::Bitshift {
                lhs: lhs.to_string(),
                direction,
                rhs: rhs.to_string(),
            }
        }
        Tag::Number => {
            let [val] = operands(input, &mut span)?;
            Leaf::Number {
                val: val.to_string(),
            }
        }
        Tag::Operator => {
            let [val] = operands(input, &mut span)?;
            Leaf::Operator {
                val: val.to_string(),
            }
        }
        Tag::LineComment => {
            let [val] = operands(input, &mut span)?;
            Leaf::LineComment {
                val: val.to_string(),
            }
        }
    };

    Ok(Spanned::new(leaf, span))
}

/// Parse one construct: its tag followed by its operands
fn leaf<'src>(input: &mut Input<'src>) -> IResult<Spanned<Leaf>> {
    let start_remaining = input.eof_offset();
    let tag = construct_tag.parse_next(input)?;

    leaf_body(*tag, tag.span(), input).map_err(|e| commit(start_remaining, e))
}

/// Parse the whole stream: constructs up to and including the end marker
fn program<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<Leaf>>> {
    let leaves: Vec<_> = repeat(0.., leaf).parse_next(input)?;
    end_of_input.parse_next(input)?;

    if input.eof_offset() > 0 {
        let mut e = ContextError::new();
        e.push(Context::Label(NOTHING_AFTER_EOF));
        return Err(ErrMode::Cut(e));
    }

    Ok(leaves)
}

/// Convert a winnow error into a diagnostic.
///
/// The error position is the token under the cursor when parsing failed.
/// Reaching the end marker (or running out of tokens) inside a construct is
/// incomplete input; anything else is an unexpected token.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let start_index = context.context().find_map(|ctx| match ctx {
        Context::StartOffset(n) => Some(tokens.len() - n),
        _ => None,
    });
    let expected = context
        .context()
        .find_map(|ctx| match ctx {
            Context::Label(label) => Some(*label),
            _ => None,
        })
        .unwrap_or(CONSTRUCT_TAG);

    let construct = start_index
        .and_then(|i| tokens.get(i))
        .and_then(|token| match token.token {
            Token::Tag(tag) => Some(Spanned::new(tag, token.span)),
            Token::Operand(_) => None,
        });

    let error_index = tokens.len() - current_remaining;
    let found = tokens.get(error_index).filter(|token| {
        token.token != Token::Tag(Tag::Eof) || expected == NOTHING_AFTER_EOF
    });

    match found {
        Some(token) => unexpected_token(token, expected, construct),
        None => incomplete_input(tokens, construct),
    }
}

fn unexpected_token(
    token: &PositionedToken,
    expected: &str,
    construct: Option<Spanned<Tag>>,
) -> Diagnostic {
    let mut diag = Diagnostic::error(format!("expected {expected}, found {}", token.token))
        .with_code(ErrorCode::E100)
        .with_label(token.span, ErrorCode::E100.description());

    match construct {
        Some(tag) => {
            diag = diag
                .with_secondary_label(tag.span(), format!("while reading {}", *tag))
                .with_help(format!(
                    "{} takes exactly {} operand(s)",
                    tag.name(),
                    tag.arity()
                ));
        }
        None if matches!(token.token, Token::Operand(_)) => {
            diag = diag.with_help("every operand must follow the tag that captured it");
        }
        None => {}
    }

    diag
}

fn incomplete_input(tokens: &[PositionedToken], construct: Option<Spanned<Tag>>) -> Diagnostic {
    let end = tokens.last().map_or(0, |token| token.span.end());

    match construct {
        Some(tag) => Diagnostic::error(format!(
            "incomplete input, {} expects {} operand(s)",
            tag.name(),
            tag.arity()
        ))
        .with_code(ErrorCode::E101)
        .with_label(
            Span::new(tag.span().start()..end.max(tag.span().end())),
            ErrorCode::E101.description(),
        ),
        None => Diagnostic::error("incomplete input, the token stream has no end marker")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(end..end), ErrorCode::E101.description())
            .with_help("token streams end with a single EOF"),
    }
}

/// Build the leaf sequence from a token stream.
///
/// # Errors
///
/// Returns a [`ParseError`] with [`ErrorCode::E100`] when an operand appears
/// where a tag is expected (or the reverse), and [`ErrorCode::E101`] when the
/// stream ends before a construct has all of its operands.
pub fn build_leaves<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<Vec<Spanned<Leaf>>, ParseError> {
    let mut token_slice = TokenSlice::new(tokens);

    match program.parse_next(&mut token_slice) {
        Ok(leaves) => {
            debug!(leaves = leaves.len(); "Built leaves");
            Ok(leaves)
        }
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining).into())
        }
    }
}
