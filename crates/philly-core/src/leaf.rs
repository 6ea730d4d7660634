//! Leaf records produced by the leaf builder.
//!
//! A [`Leaf`] is a tagged record with a fixed, tag-specific set of fields.
//! Leaves never contain other leaves: a program is a flat sequence of them,
//! and an "open" leaf (class, function, conditional) is balanced only by a
//! later close leaf in that sequence.
//!
//! Each variant maps to one leaf tag (see [`Leaf::tag_name`]). The
//! [`Display`](fmt::Display) implementation renders the record form used by
//! the `parse` stage:
//!
//! ```
//! # use philly_core::Leaf;
//! let leaf = Leaf::Var {
//!     var: "x".to_string(),
//!     val: "1".to_string(),
//!     deferred: false,
//! };
//! assert_eq!(leaf.to_string(), "{type: VAR, var: 'x', val: '1'}");
//! ```

use std::{fmt, str::FromStr};

/// Quote character that delimited a static string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `"text"`
    Double,
    /// `'text'`
    Single,
    /// `` `text` ``
    Backtick,
}

impl Delimiter {
    /// Returns the quote character.
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Double => '"',
            Delimiter::Single => '\'',
            Delimiter::Backtick => '`',
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "\"" => Ok(Delimiter::Double),
            "'" => Ok(Delimiter::Single),
            "`" => Ok(Delimiter::Backtick),
            _ => Err(format!("invalid string delimiter `{s}`")),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Direction of an order-of-magnitude comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Magnitude {
    /// `a >> b`: `a` is much greater than `b`.
    MuchGreater,
    /// `a << b`: `a` is much less than `b`.
    MuchLess,
}

impl FromStr for Magnitude {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">>" => Ok(Magnitude::MuchGreater),
            "<<" => Ok(Magnitude::MuchLess),
            _ => Err(format!("invalid magnitude comparison `{s}`")),
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Magnitude::MuchGreater => write!(f, ">>"),
            Magnitude::MuchLess => write!(f, "<<"),
        }
    }
}

/// Direction of a bit shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shift {
    Left,
    Right,
}

impl Shift {
    /// Returns the target-language operator for this shift.
    pub fn operator(self) -> &'static str {
        match self {
            Shift::Left => "<<",
            Shift::Right => ">>",
        }
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shl" => Ok(Shift::Left),
            "shr" => Ok(Shift::Right),
            _ => Err(format!("invalid shift direction `{s}`")),
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Left => write!(f, "shl"),
            Shift::Right => write!(f, "shr"),
        }
    }
}

/// One comparison of a two-operator conditional: `> 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub operator: String,
    pub val: String,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.val)
    }
}

/// A single source construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    Newline,
    Space,

    /// `boul Name {`
    Class { name: String },
    /// `boul Name <- Parent {`
    ClassExtension { name: String, parent: String },
    /// `jawn x @ Name`
    ClassInstantiation { var: String, class: String },

    CloseCurly,
    CloseParenth,
    OpenCurly,
    OpenParenth,
    OpenBracket,
    CloseBracket,

    /// `fun name {`, or `fun# name {` when deferred.
    FunctionNoParam { name: String, deferred: bool },
    /// `callee.method(`, or `#callee.method(` when deferred.
    Method {
        callee: String,
        method: String,
        deferred: bool,
    },
    Return { val: String },
    /// `x ~ Name`
    InstanceOf { var: String, class: String },

    /// `jawn x := val`
    Var {
        var: String,
        val: String,
        deferred: bool,
    },
    /// `jawn* x := val`
    VarMut {
        var: String,
        val: String,
        deferred: bool,
    },
    /// A bare variable reference.
    VarCall { var: String },
    /// A bare class or namespace reference: `Math`.
    ClassCall { class: String },
    /// `.name` after an expression.
    MemberAccess { member: String },

    /// `if (`
    CondInit,
    /// `else {`
    CondElse,
    /// `x === 1, 2, 3) {`
    CondManySingleOperator {
        var: String,
        operator: String,
        params: Vec<String>,
    },
    /// `x > 1, < 5) {`
    CondManyManyOperator {
        var: String,
        first: Comparison,
        second: Comparison,
    },

    StaticString { delimiter: Delimiter, val: String },

    /// `jawn x := :name`
    AtomInstantiation { var: String, atom: String },
    /// `:name:`
    AtomPrint { atom: String },

    /// `x[start:end]`
    Range {
        var: String,
        start: String,
        end: String,
    },
    /// `xs .+ 2`
    ArrayArithmetic {
        var: String,
        operator: String,
        val: String,
    },

    /// `=/=`
    NotEqual,
    /// `a ~= b`
    Estimate { lhs: String, rhs: String },
    /// `a ~=[precision] b`
    EstimatePrecise {
        lhs: String,
        rhs: String,
        precision: String,
    },
    /// `x /% 3`
    DivRemain { var: String, val: String },
    /// `5!`
    Factorial { val: String },

    /// `maybe) {`
    Maybe,
    /// `maybe(0.7)) {`
    MaybeWeighted { probability: String },

    /// `a >> b`
    Magnitude {
        lhs: String,
        direction: Magnitude,
        rhs: String,
    },
    /// `a >>[factor] b`
    MagnitudePrecise {
        lhs: String,
        direction: Magnitude,
        factor: String,
        rhs: String,
    },
    /// `a shl b`
    Bitshift {
        lhs: String,
        direction: Shift,
        rhs: String,
    },

    Number { val: String },
    Comma,
    Operator { val: String },
    LineComment { val: String },
}

impl Leaf {
    /// Returns the tag name of this leaf, e.g. `VAR` or `FACTORIAL`.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Leaf::Newline => "NEWLINE",
            Leaf::Space => "SPACE",
            Leaf::Class { .. } => "CLASS",
            Leaf::ClassExtension { .. } => "CLASS_EXTENSION",
            Leaf::ClassInstantiation { .. } => "CLASS_INSTANTIATION",
            Leaf::CloseCurly => "CLOSE_CURLY",
            Leaf::CloseParenth => "CLOSE_PARENTH",
            Leaf::OpenCurly => "OPEN_CURLY",
            Leaf::OpenParenth => "OPEN_PARENTH",
            Leaf::OpenBracket => "OPEN_BRACKET",
            Leaf::CloseBracket => "CLOSE_BRACKET",
            Leaf::FunctionNoParam { .. } => "FUNCTION_NOPARAM",
            Leaf::Method { .. } => "METHOD",
            Leaf::Return { .. } => "RETURN",
            Leaf::InstanceOf { .. } => "INSTANCEOF",
            Leaf::Var { .. } => "VAR",
            Leaf::VarMut { .. } => "VAR_MUT",
            Leaf::VarCall { .. } => "VAR_CALL",
            Leaf::ClassCall { .. } => "CLASS_CALL",
            Leaf::MemberAccess { .. } => "MEMBER_ACCESS",
            Leaf::CondInit => "COND_INIT",
            Leaf::CondElse => "COND_ELSE",
            Leaf::CondManySingleOperator { .. } => "COND_MANY_SINGLE_OPERATOR",
            Leaf::CondManyManyOperator { .. } => "COND_MANY_MANY_OPERATOR",
            Leaf::StaticString { .. } => "STATIC_STRING",
            Leaf::AtomInstantiation { .. } => "ATOM_INSTANTIATION",
            Leaf::AtomPrint { .. } => "ATOM_PRINT",
            Leaf::Range { .. } => "RANGE",
            Leaf::ArrayArithmetic { .. } => "ARRAY_ARITHMETIC",
            Leaf::NotEqual => "NEQUAL",
            Leaf::Estimate { .. } => "ESTIMATE",
            Leaf::EstimatePrecise { .. } => "ESTIMATE_PRECISE",
            Leaf::DivRemain { .. } => "DIV_REMAIN",
            Leaf::Factorial { .. } => "FACTORIAL",
            Leaf::Maybe => "MAYBE",
            Leaf::MaybeWeighted { .. } => "MAYBE_WEIGHTED",
            Leaf::Magnitude { .. } => "MAGNITUDE",
            Leaf::MagnitudePrecise { .. } => "MAGNITUDE_PRECISE",
            Leaf::Bitshift { .. } => "BITSHIFT",
            Leaf::Number { .. } => "NUMBER",
            Leaf::Comma => "COMMA",
            Leaf::Operator { .. } => "OPERATOR",
            Leaf::LineComment { .. } => "LINE_COMMENT",
        }
    }

    /// Returns `true` for leaves that only make sense directly after `if (`.
    ///
    /// Their rendered fragment closes the condition opened by a preceding
    /// [`Leaf::CondInit`].
    pub fn continues_condition(&self) -> bool {
        matches!(
            self,
            Leaf::CondManySingleOperator { .. }
                | Leaf::CondManyManyOperator { .. }
                | Leaf::Maybe
                | Leaf::MaybeWeighted { .. }
        )
    }
}

/// Writes a leaf as `{type: TAG, field: 'value', ...}`.
struct Record<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
}

impl<'a, 'b> Record<'a, 'b> {
    fn open(f: &'a mut fmt::Formatter<'b>, tag: &str) -> Result<Self, fmt::Error> {
        write!(f, "{{type: {tag}")?;
        Ok(Self { f })
    }

    fn field(self, name: &str, value: impl fmt::Display) -> Result<Self, fmt::Error> {
        write!(self.f, ", {name}: '{value}'")?;
        Ok(self)
    }

    fn list(self, name: &str, values: &[String]) -> Result<Self, fmt::Error> {
        write!(self.f, ", {name}: [")?;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                write!(self.f, ", ")?;
            }
            write!(self.f, "'{value}'")?;
        }
        write!(self.f, "]")?;
        Ok(self)
    }

    /// Only written when set, so unmarked leaves keep their plain form.
    fn flag(self, name: &str, set: bool) -> Result<Self, fmt::Error> {
        if set {
            write!(self.f, ", {name}: true")?;
        }
        Ok(self)
    }

    fn close(self) -> fmt::Result {
        write!(self.f, "}}")
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = Record::open(f, self.tag_name())?;
        let record = match self {
            Leaf::Newline
            | Leaf::Space
            | Leaf::CloseCurly
            | Leaf::CloseParenth
            | Leaf::OpenCurly
            | Leaf::OpenParenth
            | Leaf::OpenBracket
            | Leaf::CloseBracket
            | Leaf::CondInit
            | Leaf::CondElse
            | Leaf::NotEqual
            | Leaf::Maybe
            | Leaf::Comma => record,
            Leaf::Class { name } => record.field("name", name)?,
            Leaf::ClassExtension { name, parent } => {
                record.field("name", name)?.field("parent", parent)?
            }
            Leaf::ClassInstantiation { var, class } | Leaf::InstanceOf { var, class } => {
                record.field("var", var)?.field("class", class)?
            }
            Leaf::FunctionNoParam { name, deferred } => {
                record.field("name", name)?.flag("deferred", *deferred)?
            }
            Leaf::Method {
                callee,
                method,
                deferred,
            } => record
                .field("callee", callee)?
                .field("method", method)?
                .flag("deferred", *deferred)?,
            Leaf::Return { val }
            | Leaf::Factorial { val }
            | Leaf::Number { val }
            | Leaf::Operator { val }
            | Leaf::LineComment { val } => record.field("val", val)?,
            Leaf::Var { var, val, deferred } | Leaf::VarMut { var, val, deferred } => record
                .field("var", var)?
                .field("val", val)?
                .flag("deferred", *deferred)?,
            Leaf::VarCall { var } => record.field("var", var)?,
            Leaf::ClassCall { class } => record.field("class", class)?,
            Leaf::MemberAccess { member } => record.field("member", member)?,
            Leaf::CondManySingleOperator {
                var,
                operator,
                params,
            } => record
                .field("var", var)?
                .field("operator", operator)?
                .list("params", params)?,
            Leaf::CondManyManyOperator { var, first, second } => record
                .field("var", var)?
                .field("first", first)?
                .field("second", second)?,
            Leaf::StaticString { delimiter, val } => record
                .field("delimiter", delimiter)?
                .field("val", val)?,
            Leaf::AtomInstantiation { var, atom } => {
                record.field("var", var)?.field("atom", atom)?
            }
            Leaf::AtomPrint { atom } => record.field("atom", atom)?,
            Leaf::Range { var, start, end } => record
                .field("var", var)?
                .field("start", start)?
                .field("end", end)?,
            Leaf::ArrayArithmetic { var, operator, val } => record
                .field("var", var)?
                .field("operator", operator)?
                .field("val", val)?,
            Leaf::Estimate { lhs, rhs } => record.field("lhs", lhs)?.field("rhs", rhs)?,
            Leaf::EstimatePrecise {
                lhs,
                rhs,
                precision,
            } => record
                .field("lhs", lhs)?
                .field("rhs", rhs)?
                .field("precision", precision)?,
            Leaf::DivRemain { var, val } => record.field("var", var)?.field("val", val)?,
            Leaf::MaybeWeighted { probability } => record.field("probability", probability)?,
            Leaf::Magnitude {
                lhs,
                direction,
                rhs,
            } => record
                .field("lhs", lhs)?
                .field("direction", direction)?
                .field("rhs", rhs)?,
            Leaf::MagnitudePrecise {
                lhs,
                direction,
                factor,
                rhs,
            } => record
                .field("lhs", lhs)?
                .field("direction", direction)?
                .field("factor", factor)?
                .field("rhs", rhs)?,
            Leaf::Bitshift {
                lhs,
                direction,
                rhs,
            } => record
                .field("lhs", lhs)?
                .field("direction", direction)?
                .field("rhs", rhs)?,
        };
        record.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_payload_free_leaf() {
        assert_eq!(Leaf::Maybe.to_string(), "{type: MAYBE}");
        assert_eq!(Leaf::CloseCurly.to_string(), "{type: CLOSE_CURLY}");
    }

    #[test]
    fn test_display_var() {
        let leaf = Leaf::Var {
            var: "x".to_string(),
            val: "1".to_string(),
            deferred: false,
        };
        assert_eq!(leaf.to_string(), "{type: VAR, var: 'x', val: '1'}");
    }

    #[test]
    fn test_display_deferred_flag() {
        let leaf = Leaf::Method {
            callee: "api".to_string(),
            method: "fetch".to_string(),
            deferred: true,
        };
        assert_eq!(
            leaf.to_string(),
            "{type: METHOD, callee: 'api', method: 'fetch', deferred: true}"
        );
    }

    #[test]
    fn test_display_params_list() {
        let leaf = Leaf::CondManySingleOperator {
            var: "x".to_string(),
            operator: "===".to_string(),
            params: vec!["1".to_string(), "2".to_string()],
        };
        assert_eq!(
            leaf.to_string(),
            "{type: COND_MANY_SINGLE_OPERATOR, var: 'x', operator: '===', params: ['1', '2']}"
        );
    }

    #[test]
    fn test_display_member_access() {
        let leaf = Leaf::MemberAccess {
            member: "PI".to_string(),
        };
        assert_eq!(leaf.to_string(), "{type: MEMBER_ACCESS, member: 'PI'}");
        assert_eq!(Leaf::OpenBracket.to_string(), "{type: OPEN_BRACKET}");
    }

    #[test]
    fn test_continues_condition() {
        assert!(Leaf::Maybe.continues_condition());
        assert!(
            Leaf::MaybeWeighted {
                probability: "0.2".to_string()
            }
            .continues_condition()
        );
        assert!(!Leaf::CondInit.continues_condition());
        assert!(!Leaf::Space.continues_condition());
    }

    #[test]
    fn test_operand_enums_from_str() {
        assert_eq!("'".parse::<Delimiter>(), Ok(Delimiter::Single));
        assert_eq!("<<".parse::<Magnitude>(), Ok(Magnitude::MuchLess));
        assert_eq!("shr".parse::<Shift>(), Ok(Shift::Right));
        assert!("?".parse::<Delimiter>().is_err());
        assert!(">>>".parse::<Magnitude>().is_err());
        assert!("rol".parse::<Shift>().is_err());
    }
}
