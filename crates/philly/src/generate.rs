//! JavaScript generation.
//!
//! Every leaf renders to one JavaScript fragment and the fragments are
//! concatenated in program order with no separators. Rendering is plain text
//! substitution: operand values are spliced in as written and nothing is
//! evaluated at compile time.

use std::fmt;

use log::debug;

use philly_core::{Leaf, Program, leaf::Magnitude};

/// Factor used by `>>` and `<<` when none is given.
const DEFAULT_MAGNITUDE: &str = "10";
/// Threshold used by an unweighted `maybe`.
const DEFAULT_PROBABILITY: &str = "0.5";

/// Renders a single leaf as JavaScript.
pub struct Fragment<'a>(pub &'a Leaf);

impl fmt::Display for Fragment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Leaf::Newline => writeln!(f),
            Leaf::Space => write!(f, " "),

            Leaf::Class { name } => write!(f, "class {name} {{"),
            Leaf::ClassExtension { name, parent } => {
                write!(f, "class {name} extends {parent} {{")
            }
            Leaf::ClassInstantiation { var, class } => write!(f, "const {var} = new {class}()"),

            Leaf::CloseCurly => write!(f, "}}"),
            Leaf::CloseParenth => write!(f, ")"),
            Leaf::OpenCurly => write!(f, "{{"),
            Leaf::OpenParenth => write!(f, "("),
            Leaf::OpenBracket => write!(f, "["),
            Leaf::CloseBracket => write!(f, "]"),

            Leaf::FunctionNoParam { name, deferred } => {
                if *deferred {
                    write!(f, "async ")?;
                }
                write!(f, "function {name}() {{")
            }
            Leaf::Method {
                callee,
                method,
                deferred,
            } => {
                if *deferred {
                    write!(f, "await ")?;
                }
                write!(f, "{callee}.{method}(")
            }
            Leaf::Return { val } => write!(f, "return {val}"),
            Leaf::InstanceOf { var, class } => write!(f, "{var} instanceof {class}"),

            Leaf::Var { var, val, deferred } => declaration(f, "const", var, val, *deferred),
            Leaf::VarMut { var, val, deferred } => declaration(f, "let", var, val, *deferred),
            Leaf::VarCall { var } => write!(f, "{var}"),
            Leaf::ClassCall { class } => write!(f, "{class}"),
            Leaf::MemberAccess { member } => write!(f, ".{member}"),

            Leaf::CondInit => write!(f, "if ("),
            Leaf::CondElse => write!(f, "else {{"),
            Leaf::CondManySingleOperator {
                var,
                operator,
                params,
            } => {
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, " || ")?;
                    }
                    write!(f, "{var} {operator} {param}")?;
                }
                write!(f, ") {{")
            }
            Leaf::CondManyManyOperator { var, first, second } => {
                write!(f, "{var} {first} || {var} {second}) {{")
            }

            Leaf::StaticString { delimiter, val } => write!(f, "{delimiter}{val}{delimiter}"),
            Leaf::AtomInstantiation { var, atom } => {
                write!(f, "const {var} = Symbol.for('{atom}')")
            }
            Leaf::AtomPrint { atom } => write!(f, "Symbol.keyFor({atom})"),
            Leaf::Range { var, start, end } => write!(
                f,
                "((value) => {{ \
                 if (Array.isArray(value)) {{ return value.slice({start}, {end}) }} \
                 if (typeof value === 'string') {{ return value.substring({start}, {end}) }} \
                 throw new TypeError(`cannot take [{start}:{end}] of ${{String(value)}}`) \
                 }})({var})"
            ),
            Leaf::ArrayArithmetic { var, operator, val } => {
                write!(f, "{var}.map((element) => element {operator} {val})")
            }

            Leaf::NotEqual => write!(f, "!=="),
            Leaf::Estimate { lhs, rhs } => {
                write!(f, "(Math.round({lhs}) === Math.round({rhs}))")
            }
            Leaf::EstimatePrecise {
                lhs,
                rhs,
                precision,
            } => write!(
                f,
                "(Math.round({lhs} / {precision}) === Math.round({rhs} / {precision}))"
            ),
            Leaf::DivRemain { var, val } => write!(f, "[Math.floor({var} / {val}), {var} % {val}]"),
            Leaf::Factorial { val } => write!(
                f,
                "(() => {{ let product = 1; \
                 for (let i = 2; i <= {val}; i++) {{ product *= i }} \
                 return product }})()"
            ),
            Leaf::Maybe => write!(f, "Math.random() < {DEFAULT_PROBABILITY}) {{"),
            Leaf::MaybeWeighted { probability } => write!(f, "Math.random() < {probability}) {{"),
            Leaf::Magnitude {
                lhs,
                direction,
                rhs,
            } => magnitude(f, lhs, *direction, DEFAULT_MAGNITUDE, rhs),
            Leaf::MagnitudePrecise {
                lhs,
                direction,
                factor,
                rhs,
            } => magnitude(f, lhs, *direction, factor, rhs),
            Leaf::Bitshift {
                lhs,
                direction,
                rhs,
            } => write!(f, "{lhs} {} {rhs}", direction.operator()),

            Leaf::Number { val } | Leaf::Operator { val } | Leaf::LineComment { val } => {
                write!(f, "{val}")
            }
            Leaf::Comma => write!(f, ","),
        }
    }
}

fn declaration(
    f: &mut fmt::Formatter<'_>,
    keyword: &str,
    var: &str,
    val: &str,
    deferred: bool,
) -> fmt::Result {
    write!(f, "{keyword} {var} = ")?;
    if deferred {
        write!(f, "await ")?;
    }
    write!(f, "{val}")
}

fn magnitude(
    f: &mut fmt::Formatter<'_>,
    lhs: &str,
    direction: Magnitude,
    factor: &str,
    rhs: &str,
) -> fmt::Result {
    match direction {
        Magnitude::MuchGreater => write!(f, "({lhs} > {rhs} * {factor})"),
        Magnitude::MuchLess => write!(f, "({lhs} * {factor} < {rhs})"),
    }
}

/// Render a whole program as JavaScript.
pub fn transpile(program: &Program) -> String {
    let output: String = program
        .iter()
        .map(|leaf| Fragment(leaf).to_string())
        .collect();
    debug!(leaves = program.len(), bytes = output.len(); "Generated JavaScript");
    output
}
