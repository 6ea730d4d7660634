//! Grammar rule table for PhillyScript.
//!
//! Each [`Rule`] pairs a regular expression, anchored at the current scan
//! position, with the [`Tag`] it produces and the names of the capture groups
//! that become the tag's operands, in left-to-right order. The lexer
//! evaluates every rule at each position and keeps the longest match; when
//! two rules match the same length the one listed first wins.
//!
//! Capture groups named `deferred` are markers: they select the tag variant
//! and never become operands.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::tokens::Tag;

/// Lower camel case variable name.
const IDENT: &str = r"[a-z][A-Za-z0-9_]*";
/// Title case class name.
const CLASS: &str = r"[A-Z][A-Za-z0-9]*";
/// Property or method name after a `.`.
const MEMBER: &str = r"[A-Za-z_$][A-Za-z0-9_$]*";
const NUM: &str = r"-?[0-9]+(?:\.[0-9]+)?";
const COND_OP: &str = r"===|!==|==|!=|<=|>=|<|>";
/// One right-hand value of a multi-value condition. Quoted strings are read
/// whole, so a comma inside quotes does not end the value.
const COND_VALUE: &str =
    r#"(?:"(?:[^"\\\r\n]|\\.)*"|'(?:[^'\\\r\n]|\\.)*'|[^,()"'\r\n])+"#;
/// Everything up to the end of the line.
const REST: &str = r"[^\r\n]*";
/// Right-hand side of `jawn x :=`. A value starting with an atom (`:name`)
/// is left to the atom rule, even when a comment follows it.
const DECLARED_VALUE: &str = r"(?:[^:\r\n][^\r\n]*|:[^a-z\r\n][^\r\n]*)?";

/// A single tokenizer rule.
pub(crate) struct Rule {
    name: &'static str,
    pattern: Regex,
    build: fn(&Captures<'_>) -> Tag,
    operands: &'static [&'static str],
}

impl Rule {
    fn new(
        name: &'static str,
        pattern: &str,
        build: fn(&Captures<'_>) -> Tag,
        operands: &'static [&'static str],
    ) -> Self {
        let pattern = Regex::new(&format!("^(?:{pattern})"))
            .unwrap_or_else(|err| panic!("invalid pattern for rule {name}: {err}"));
        Self {
            name,
            pattern,
            build,
            operands,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// Match this rule at the start of `rest`.
    pub(crate) fn captures<'src>(&self, rest: &'src str) -> Option<Captures<'src>> {
        self.pattern.captures(rest)
    }

    /// Build the tag for a successful match of this rule.
    pub(crate) fn tag(&self, captures: &Captures<'_>) -> Tag {
        (self.build)(captures)
    }

    /// Capture group names that become operands, in source order.
    pub(crate) fn operands(&self) -> &'static [&'static str] {
        self.operands
    }
}

fn deferred(captures: &Captures<'_>) -> bool {
    captures.name("deferred").is_some()
}

fn operand() -> String {
    format!("(?:{IDENT}|{NUM})")
}

static CONDITION_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(COND_VALUE).expect("condition value pattern is valid"));

/// Split the `params` operand of a multi-value condition into its values.
///
/// `1, "a,b" ,3` yields `1`, `"a,b"` and `3`.
pub(crate) fn condition_values(params: &str) -> impl Iterator<Item = &str> {
    CONDITION_VALUE
        .find_iter(params)
        .map(|value| value.as_str().trim())
        .filter(|value| !value.is_empty())
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let operand = operand();

    vec![
        Rule::new("newline", r"\r?\n", |_| Tag::Newline, &[]),
        Rule::new("space", r"[ \t]", |_| Tag::Space, &[]),
        Rule::new(
            "line_comment",
            &format!(r"(?P<val>//{REST})"),
            |_| Tag::LineComment,
            &["val"],
        ),
        // Classes
        Rule::new(
            "class_extension",
            &format!(r"boul (?P<name>{CLASS}) <- (?P<parent>{CLASS}) \{{"),
            |_| Tag::ClassExtension,
            &["name", "parent"],
        ),
        Rule::new(
            "class",
            &format!(r"boul (?P<name>{CLASS}) \{{"),
            |_| Tag::Class,
            &["name"],
        ),
        Rule::new(
            "class_instantiation",
            &format!(r"jawn (?P<var>{IDENT}) @ (?P<class>{CLASS})"),
            |_| Tag::ClassInstantiation,
            &["var", "class"],
        ),
        Rule::new(
            "instanceof",
            &format!(r"(?P<var>{IDENT}) ~ (?P<class>{CLASS})"),
            |_| Tag::InstanceOf,
            &["var", "class"],
        ),
        // Declarations; atoms come first so they win ties against `var`
        Rule::new(
            "atom_instantiation",
            &format!(r"jawn (?P<var>{IDENT}) := :(?P<atom>{IDENT})"),
            |_| Tag::AtomInstantiation,
            &["var", "atom"],
        ),
        Rule::new(
            "var_mut",
            &format!(r"jawn\* (?P<var>{IDENT}) := (?P<deferred>#)?(?P<val>{REST})"),
            |captures| Tag::VarMut {
                deferred: deferred(captures),
            },
            &["var", "val"],
        ),
        Rule::new(
            "var",
            &format!(r"jawn (?P<var>{IDENT}) := (?P<deferred>#)?(?P<val>{DECLARED_VALUE})"),
            |captures| Tag::Var {
                deferred: deferred(captures),
            },
            &["var", "val"],
        ),
        // Functions and calls
        Rule::new(
            "function_noparam",
            r"fun(?P<deferred>#)? (?P<name>[A-Za-z_][A-Za-z0-9_]*) \{",
            |captures| Tag::FunctionNoParam {
                deferred: deferred(captures),
            },
            &["name"],
        ),
        Rule::new(
            "method",
            &format!(r"(?P<deferred>#)?(?P<callee>{MEMBER}(?:\.{MEMBER})*)\.(?P<method>{MEMBER})\("),
            |captures| Tag::Method {
                deferred: deferred(captures),
            },
            &["callee", "method"],
        ),
        Rule::new(
            "return",
            &format!(r"return (?P<val>{REST})"),
            |_| Tag::Return,
            &["val"],
        ),
        // Conditionals; two-operator form first so it wins ties
        Rule::new("cond_init", r"if \(", |_| Tag::CondInit, &[]),
        Rule::new("cond_else", r"else \{", |_| Tag::CondElse, &[]),
        Rule::new(
            "cond_many_many_operator",
            &format!(
                r"(?P<var>{IDENT}) (?P<first_operator>{COND_OP}) (?P<first_val>{COND_VALUE}), ?(?P<second_operator>{COND_OP}) (?P<second_val>{COND_VALUE})\) \{{"
            ),
            |_| Tag::CondManyManyOperator,
            &[
                "var",
                "first_operator",
                "first_val",
                "second_operator",
                "second_val",
            ],
        ),
        Rule::new(
            "cond_many_single_operator",
            &format!(
                r"(?P<var>{IDENT}) (?P<operator>{COND_OP}) (?P<params>{COND_VALUE}(?:, ?{COND_VALUE})*)\) \{{"
            ),
            |_| Tag::CondManySingleOperator,
            &["var", "operator", "params"],
        ),
        Rule::new("maybe", r"maybe\) \{", |_| Tag::Maybe, &[]),
        Rule::new(
            "maybe_weighted",
            r"maybe\((?P<probability>[0-9]*\.?[0-9]+)\)\) \{",
            |_| Tag::MaybeWeighted,
            &["probability"],
        ),
        // Literals
        Rule::new(
            "static_string_double",
            r#"(?P<delimiter>")(?P<val>(?:[^"\\\r\n]|\\.)*)""#,
            |_| Tag::StaticString,
            &["delimiter", "val"],
        ),
        Rule::new(
            "static_string_single",
            r"(?P<delimiter>')(?P<val>(?:[^'\\\r\n]|\\.)*)'",
            |_| Tag::StaticString,
            &["delimiter", "val"],
        ),
        Rule::new(
            "static_string_backtick",
            r"(?P<delimiter>`)(?P<val>(?:[^`\\]|\\(?s:.))*)`",
            |_| Tag::StaticString,
            &["delimiter", "val"],
        ),
        Rule::new(
            "atom_print",
            &format!(r":(?P<atom>{IDENT}):"),
            |_| Tag::AtomPrint,
            &["atom"],
        ),
        // Operators with their own semantics
        Rule::new(
            "range",
            &format!(r"(?P<var>{IDENT})\[(?P<start>[0-9]+):(?P<end>[0-9]+)\]"),
            |_| Tag::Range,
            &["var", "start", "end"],
        ),
        Rule::new(
            "array_arithmetic",
            &format!(r"(?P<var>{IDENT}) \.(?P<operator>[-+*/%]) (?P<val>{operand})"),
            |_| Tag::ArrayArithmetic,
            &["var", "operator", "val"],
        ),
        Rule::new("nequal", r"=/=", |_| Tag::NotEqual, &[]),
        Rule::new(
            "estimate_precise",
            &format!(r"(?P<lhs>{operand}) ~=\[(?P<precision>{NUM})\] (?P<rhs>{operand})"),
            |_| Tag::EstimatePrecise,
            &["lhs", "precision", "rhs"],
        ),
        Rule::new(
            "estimate",
            &format!(r"(?P<lhs>{operand}) ~= (?P<rhs>{operand})"),
            |_| Tag::Estimate,
            &["lhs", "rhs"],
        ),
        Rule::new(
            "div_remain",
            &format!(r"(?P<var>{operand}) /% (?P<val>{operand})"),
            |_| Tag::DivRemain,
            &["var", "val"],
        ),
        Rule::new(
            "factorial",
            r"(?P<val>[0-9]+)!",
            |_| Tag::Factorial,
            &["val"],
        ),
        Rule::new(
            "magnitude_precise",
            &format!(
                r"(?P<lhs>{operand}) (?P<direction>>>|<<)\[(?P<factor>{NUM})\] (?P<rhs>{operand})"
            ),
            |_| Tag::MagnitudePrecise,
            &["lhs", "direction", "factor", "rhs"],
        ),
        Rule::new(
            "magnitude",
            &format!(r"(?P<lhs>{operand}) (?P<direction>>>|<<) (?P<rhs>{operand})"),
            |_| Tag::Magnitude,
            &["lhs", "direction", "rhs"],
        ),
        Rule::new(
            "bitshift",
            &format!(r"(?P<lhs>{operand}) (?P<direction>shl|shr) (?P<rhs>{operand})"),
            |_| Tag::Bitshift,
            &["lhs", "direction", "rhs"],
        ),
        // Generic building blocks
        Rule::new(
            "var_call",
            &format!(r"(?P<var>{IDENT})"),
            |_| Tag::VarCall,
            &["var"],
        ),
        Rule::new(
            "class_call",
            &format!(r"(?P<class>{CLASS})"),
            |_| Tag::ClassCall,
            &["class"],
        ),
        Rule::new(
            "member_access",
            &format!(r"\.(?P<member>{MEMBER})"),
            |_| Tag::MemberAccess,
            &["member"],
        ),
        Rule::new(
            "number",
            &format!(r"(?P<val>{NUM})"),
            |_| Tag::Number,
            &["val"],
        ),
        Rule::new(
            "operator",
            r"(?P<val>===|!==|==|!=|<=|>=|&&|\|\||[-+*/%<>!=])",
            |_| Tag::Operator,
            &["val"],
        ),
        Rule::new("comma", r",", |_| Tag::Comma, &[]),
        Rule::new("open_parenth", r"\(", |_| Tag::OpenParenth, &[]),
        Rule::new("close_parenth", r"\)", |_| Tag::CloseParenth, &[]),
        Rule::new("open_curly", r"\{", |_| Tag::OpenCurly, &[]),
        Rule::new("close_curly", r"\}", |_| Tag::CloseCurly, &[]),
        Rule::new("open_bracket", r"\[", |_| Tag::OpenBracket, &[]),
        Rule::new("close_bracket", r"\]", |_| Tag::CloseBracket, &[]),
    ]
});

/// The grammar rules in priority order.
pub(crate) fn rules() -> &'static [Rule] {
    &RULES
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Find the rule with the given name.
    fn rule(name: &str) -> &'static Rule {
        rules()
            .iter()
            .find(|rule| rule.name() == name)
            .unwrap_or_else(|| panic!("no rule named {name}"))
    }

    #[test]
    fn test_rule_names_are_unique() {
        let mut names: Vec<_> = rules().iter().map(Rule::name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_operand_groups_exist_in_patterns() {
        for rule in rules() {
            let groups: Vec<_> = rule.pattern.capture_names().flatten().collect();
            for operand in rule.operands() {
                assert!(
                    groups.contains(operand),
                    "rule {} lists operand `{operand}` but has no such group",
                    rule.name()
                );
            }
        }
    }

    /// Every rule captures exactly as many operands as its tag consumes.
    #[test]
    fn test_rule_operands_match_tag_arity() {
        let samples = [
            ("newline", "\n"),
            ("space", " "),
            ("line_comment", "// note"),
            ("class_extension", "boul Dog <- Animal {"),
            ("class", "boul Dog {"),
            ("class_instantiation", "jawn rex @ Dog"),
            ("instanceof", "rex ~ Dog"),
            ("atom_instantiation", "jawn x := :ok"),
            ("var_mut", "jawn* x := #load"),
            ("var", "jawn x := 1"),
            ("function_noparam", "fun# main {"),
            ("method", "#console.log("),
            ("return", "return x"),
            ("cond_init", "if ("),
            ("cond_else", "else {"),
            ("cond_many_many_operator", "x > 1, < 5) {"),
            ("cond_many_single_operator", "x === 1, 2) {"),
            ("maybe", "maybe) {"),
            ("maybe_weighted", "maybe(0.7)) {"),
            ("static_string_double", "\"hi\""),
            ("static_string_single", "'hi'"),
            ("static_string_backtick", "`hi`"),
            ("atom_print", ":ok:"),
            ("range", "xs[1:3]"),
            ("array_arithmetic", "xs .* 2"),
            ("nequal", "=/="),
            ("estimate_precise", "a ~=[10] b"),
            ("estimate", "a ~= b"),
            ("div_remain", "x /% 3"),
            ("factorial", "5!"),
            ("magnitude_precise", "a >>[100] b"),
            ("magnitude", "a << b"),
            ("bitshift", "a shl 2"),
            ("var_call", "x"),
            ("class_call", "Math"),
            ("member_access", ".PI"),
            ("number", "-1.5"),
            ("operator", "==="),
            ("comma", ","),
            ("open_parenth", "("),
            ("close_parenth", ")"),
            ("open_curly", "{"),
            ("close_curly", "}"),
            ("open_bracket", "["),
            ("close_bracket", "]"),
        ];
        assert_eq!(samples.len(), rules().len(), "every rule needs a sample");

        for (name, sample) in samples {
            let rule = rule(name);
            let captures = rule
                .captures(sample)
                .unwrap_or_else(|| panic!("rule {name} does not match `{sample}`"));
            assert_eq!(
                captures.get(0).map(|m| m.len()),
                Some(sample.len()),
                "rule {name} should match all of `{sample}`"
            );
            assert_eq!(
                rule.operands().len(),
                rule.tag(&captures).arity(),
                "rule {name} operand count differs from its tag arity"
            );
        }
    }

    #[test]
    fn test_deferred_marker_selects_tag() {
        let rule = rule("var");
        let plain = rule.captures("jawn x := y").unwrap();
        let marked = rule.captures("jawn x := #y").unwrap();

        assert_eq!(rule.tag(&plain), Tag::Var { deferred: false });
        assert_eq!(rule.tag(&marked), Tag::Var { deferred: true });
        assert_eq!(marked.name("val").map(|m| m.as_str()), Some("y"));
    }

    #[test]
    fn test_strings_keep_escaped_quotes() {
        let double = rule("static_string_double")
            .captures(r#""say \"hi\"" + x"#)
            .unwrap();
        assert_eq!(double.name("val").map(|m| m.as_str()), Some(r#"say \"hi\""#));

        let single = rule("static_string_single").captures(r"'it\'s'").unwrap();
        assert_eq!(single.name("val").map(|m| m.as_str()), Some(r"it\'s"));

        let backtick = rule("static_string_backtick").captures(r"`a\`b`").unwrap();
        assert_eq!(backtick.name("val").map(|m| m.as_str()), Some(r"a\`b"));
    }

    #[test]
    fn test_condition_values_keep_quoted_commas() {
        let values: Vec<_> = condition_values(r#"1, "a,b" ,'c, d',x + 1"#).collect();
        assert_eq!(values, ["1", r#""a,b""#, "'c, d'", "x + 1"]);

        let captures = rule("cond_many_single_operator")
            .captures(r#"name === "a,b") {"#)
            .unwrap();
        assert_eq!(
            captures.name("params").map(|m| m.as_str()),
            Some(r#""a,b""#)
        );
    }

    #[test]
    fn test_var_leaves_atom_values_to_atom_rule() {
        let var = rule("var");
        let atom = rule("atom_instantiation");
        let source = "jawn s := :ok // note";

        let var_len = var.captures(source).map_or(0, |c| c.get(0).map_or(0, |m| m.len()));
        let atom_len = atom.captures(source).map_or(0, |c| c.get(0).map_or(0, |m| m.len()));
        assert!(atom_len > var_len);
        assert_eq!(
            var.captures("jawn url := 'http://x' // home")
                .and_then(|c| c.name("val").map(|m| m.as_str())),
            Some("'http://x' // home")
        );
    }

    #[test]
    fn test_rules_are_anchored() {
        assert!(rule("factorial").captures("x 5!").is_none());
        assert!(rule("nequal").captures(" =/=").is_none());
    }
}
