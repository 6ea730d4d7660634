//! Token model for PhillyScript.
//!
//! The token stream is flat: a construct [`Tag`] is followed directly by the
//! operand values its grammar rule captured, and the stream ends with a
//! single [`Tag::Eof`]. `jawn x := 1` therefore tokenizes as
//! `[VAR, 'x', '1', EOF]`.

use std::fmt;

use crate::span::Span;

/// Closed set of construct tags.
///
/// The deferred (`#`) marker is folded into the tag rather than emitted as
/// an operand, so every tag has a fixed [`arity`](Tag::arity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Newline,
    Space,
    Eof,

    Class,
    ClassExtension,
    ClassInstantiation,

    CloseCurly,
    CloseParenth,
    OpenCurly,
    OpenParenth,
    OpenBracket,
    CloseBracket,

    FunctionNoParam { deferred: bool },
    Method { deferred: bool },
    Return,
    InstanceOf,

    Var { deferred: bool },
    VarMut { deferred: bool },
    VarCall,
    ClassCall,
    MemberAccess,

    CondInit,
    CondElse,
    CondManySingleOperator,
    CondManyManyOperator,

    StaticString,
    AtomInstantiation,
    AtomPrint,
    Range,
    ArrayArithmetic,

    NotEqual,
    Estimate,
    EstimatePrecise,
    DivRemain,
    Factorial,
    Maybe,
    MaybeWeighted,
    Magnitude,
    MagnitudePrecise,
    Bitshift,

    Number,
    Comma,
    Operator,
    LineComment,
}

impl Tag {
    /// Number of operand tokens that follow this tag in the stream.
    pub fn arity(self) -> usize {
        match self {
            Tag::Newline
            | Tag::Space
            | Tag::Eof
            | Tag::CloseCurly
            | Tag::CloseParenth
            | Tag::OpenCurly
            | Tag::OpenParenth
            | Tag::OpenBracket
            | Tag::CloseBracket
            | Tag::CondInit
            | Tag::CondElse
            | Tag::NotEqual
            | Tag::Maybe
            | Tag::Comma => 0,
            Tag::Class
            | Tag::FunctionNoParam { .. }
            | Tag::Return
            | Tag::VarCall
            | Tag::ClassCall
            | Tag::MemberAccess
            | Tag::AtomPrint
            | Tag::Factorial
            | Tag::MaybeWeighted
            | Tag::Number
            | Tag::Operator
            | Tag::LineComment => 1,
            Tag::ClassExtension
            | Tag::ClassInstantiation
            | Tag::Method { .. }
            | Tag::InstanceOf
            | Tag::Var { .. }
            | Tag::VarMut { .. }
            | Tag::StaticString
            | Tag::AtomInstantiation
            | Tag::Estimate
            | Tag::DivRemain => 2,
            Tag::CondManySingleOperator
            | Tag::Range
            | Tag::ArrayArithmetic
            | Tag::EstimatePrecise
            | Tag::Magnitude
            | Tag::Bitshift => 3,
            Tag::MagnitudePrecise => 4,
            Tag::CondManyManyOperator => 5,
        }
    }

    /// Upper-case tag name, e.g. `CLASS_EXTENSION`.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Newline => "NEWLINE",
            Tag::Space => "SPACE",
            Tag::Eof => "EOF",
            Tag::Class => "CLASS",
            Tag::ClassExtension => "CLASS_EXTENSION",
            Tag::ClassInstantiation => "CLASS_INSTANTIATION",
            Tag::CloseCurly => "CLOSE_CURLY",
            Tag::CloseParenth => "CLOSE_PARENTH",
            Tag::OpenCurly => "OPEN_CURLY",
            Tag::OpenParenth => "OPEN_PARENTH",
            Tag::OpenBracket => "OPEN_BRACKET",
            Tag::CloseBracket => "CLOSE_BRACKET",
            Tag::FunctionNoParam { .. } => "FUNCTION_NOPARAM",
            Tag::Method { .. } => "METHOD",
            Tag::Return => "RETURN",
            Tag::InstanceOf => "INSTANCEOF",
            Tag::Var { .. } => "VAR",
            Tag::VarMut { .. } => "VAR_MUT",
            Tag::VarCall => "VAR_CALL",
            Tag::ClassCall => "CLASS_CALL",
            Tag::MemberAccess => "MEMBER_ACCESS",
            Tag::CondInit => "COND_INIT",
            Tag::CondElse => "COND_ELSE",
            Tag::CondManySingleOperator => "COND_MANY_SINGLE_OPERATOR",
            Tag::CondManyManyOperator => "COND_MANY_MANY_OPERATOR",
            Tag::StaticString => "STATIC_STRING",
            Tag::AtomInstantiation => "ATOM_INSTANTIATION",
            Tag::AtomPrint => "ATOM_PRINT",
            Tag::Range => "RANGE",
            Tag::ArrayArithmetic => "ARRAY_ARITHMETIC",
            Tag::NotEqual => "NEQUAL",
            Tag::Estimate => "ESTIMATE",
            Tag::EstimatePrecise => "ESTIMATE_PRECISE",
            Tag::DivRemain => "DIV_REMAIN",
            Tag::Factorial => "FACTORIAL",
            Tag::Maybe => "MAYBE",
            Tag::MaybeWeighted => "MAYBE_WEIGHTED",
            Tag::Magnitude => "MAGNITUDE",
            Tag::MagnitudePrecise => "MAGNITUDE_PRECISE",
            Tag::Bitshift => "BITSHIFT",
            Tag::Number => "NUMBER",
            Tag::Comma => "COMMA",
            Tag::Operator => "OPERATOR",
            Tag::LineComment => "LINE_COMMENT",
        }
    }

    fn is_deferred(self) -> bool {
        matches!(
            self,
            Tag::FunctionNoParam { deferred: true }
                | Tag::Method { deferred: true }
                | Tag::Var { deferred: true }
                | Tag::VarMut { deferred: true }
        )
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if self.is_deferred() {
            write!(f, "[deferred]")?;
        }
        Ok(())
    }
}

/// A single entry of the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    /// A construct tag.
    Tag(Tag),
    /// A value captured by the rule that produced the preceding tag.
    ///
    /// Optional capture groups that did not participate yield `""`.
    Operand(&'src str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Tag(tag) => write!(f, "{tag}"),
            Token::Operand(value) => write!(f, "'{value}'"),
        }
    }
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

/// Formats a token stream as `[VAR, 'x', '1', EOF]`.
pub struct TokenList<'a, 'src>(pub &'a [PositionedToken<'src>]);

impl fmt::Display for TokenList<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", token.token)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display_with_marker() {
        assert_eq!(Tag::Var { deferred: false }.to_string(), "VAR");
        assert_eq!(Tag::Var { deferred: true }.to_string(), "VAR[deferred]");
        assert_eq!(Tag::NotEqual.to_string(), "NEQUAL");
    }

    #[test]
    fn test_token_list_display() {
        let tokens = [
            PositionedToken::new(Token::Tag(Tag::Var { deferred: false }), Span::new(0..11)),
            PositionedToken::new(Token::Operand("x"), Span::new(5..6)),
            PositionedToken::new(Token::Operand("1"), Span::new(10..11)),
            PositionedToken::new(Token::Tag(Tag::Eof), Span::new(11..11)),
        ];

        assert_eq!(TokenList(&tokens).to_string(), "[VAR, 'x', '1', EOF]");
    }

    #[test]
    fn test_payload_free_tags_have_zero_arity() {
        for tag in [
            Tag::Newline,
            Tag::Space,
            Tag::CloseCurly,
            Tag::CloseParenth,
            Tag::NotEqual,
            Tag::Maybe,
            Tag::CondInit,
        ] {
            assert_eq!(tag.arity(), 0, "{tag} should carry no operands");
        }
    }
}
