//! Comparison operators and their textual aliases.
//!
//! The [`Op`] enum is the canonical operator catalog. Clients and field
//! declarations refer to operators by token (`"lt"`, `"contain"`, ...);
//! [`Op::from_token`] resolves a token through a process-wide immutable
//! alias table.
//!
//! Operators are projected onto the two comparator families through
//! [`Op::numeric`] and [`Op::textual`]. Schema gating and comparator
//! selection both go through these projections.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

/// Comparison operator for a filter criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Op {
    /// Sentinel. Never produced by token lookup and never legal on a field.
    Unknown,
    /// Text contains substring.
    Contains,
    /// Less than.
    LessThan,
    /// Less than or equal.
    LessEqual,
    /// Equal.
    Equal,
    /// Greater than or equal.
    GreaterEqual,
    /// Greater than.
    GreaterThan,
    /// Not equal.
    NotEqual,
    /// Text does not contain substring.
    NotContains,
}

/// Token aliases, one row per operator. Alias sets are disjoint.
const ALIASES: &[(Op, &[&str])] = &[
    (Op::Contains, &["c", "contain", "contains"]),
    (Op::LessThan, &["lt", "less_than"]),
    (Op::LessEqual, &["lte", "less_equal"]),
    (Op::Equal, &["eq", "equal"]),
    (Op::GreaterEqual, &["gte", "greater_equal"]),
    (Op::GreaterThan, &["gt", "greater_than"]),
    (Op::NotEqual, &["neq", "not_equal"]),
    (Op::NotContains, &["nc", "notcontain", "not_contains"]),
];

static TOKENS: Lazy<HashMap<&'static str, Op>> = Lazy::new(|| {
    ALIASES
        .iter()
        .flat_map(|(op, tokens)| tokens.iter().map(move |token| (*token, *op)))
        .collect()
});

impl Op {
    /// Every operator that can appear on input, in catalog order.
    pub const ALL: [Op; 8] = [
        Op::Contains,
        Op::LessThan,
        Op::LessEqual,
        Op::Equal,
        Op::GreaterEqual,
        Op::GreaterThan,
        Op::NotEqual,
        Op::NotContains,
    ];

    /// Resolves a textual token to an operator.
    ///
    /// Lookup is exact: no trimming and no case folding.
    pub fn from_token(token: &str) -> Option<Op> {
        TOKENS.get(token).copied()
    }

    /// Returns the accepted tokens for this operator.
    pub fn aliases(self) -> &'static [&'static str] {
        ALIASES
            .iter()
            .find(|(op, _)| *op == self)
            .map(|(_, tokens)| *tokens)
            .unwrap_or(&[])
    }

    /// Returns the snake_case canonical token.
    pub fn canonical(self) -> &'static str {
        match self {
            Op::Unknown => "unknown",
            Op::Contains => "contains",
            Op::LessThan => "less_than",
            Op::LessEqual => "less_equal",
            Op::Equal => "equal",
            Op::GreaterEqual => "greater_equal",
            Op::GreaterThan => "greater_than",
            Op::NotEqual => "not_equal",
            Op::NotContains => "not_contains",
        }
    }

    /// Returns the human-readable name used in diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            Op::Unknown => "unknown",
            Op::Contains => "contains",
            Op::LessThan => "less than",
            Op::LessEqual => "less than or equal",
            Op::Equal => "equal",
            Op::GreaterEqual => "greater than or equal",
            Op::GreaterThan => "greater than",
            Op::NotEqual => "not equal",
            Op::NotContains => "not contain",
        }
    }

    /// Projects this operator onto the numeric comparator family.
    pub fn numeric(self) -> Option<NumericOp> {
        match self {
            Op::LessThan => Some(NumericOp::Lt),
            Op::LessEqual => Some(NumericOp::Lte),
            Op::Equal => Some(NumericOp::Eq),
            Op::GreaterEqual => Some(NumericOp::Gte),
            Op::GreaterThan => Some(NumericOp::Gt),
            Op::NotEqual => Some(NumericOp::Ne),
            Op::Unknown | Op::Contains | Op::NotContains => None,
        }
    }

    /// Projects this operator onto the text comparator family.
    pub fn textual(self) -> Option<TextOp> {
        match self {
            Op::Contains => Some(TextOp::Contains),
            Op::Equal => Some(TextOp::Eq),
            Op::NotEqual => Some(TextOp::Ne),
            Op::NotContains => Some(TextOp::NotContains),
            Op::Unknown
            | Op::LessThan
            | Op::LessEqual
            | Op::GreaterEqual
            | Op::GreaterThan => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Operators legal on integer and floating-point fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericOp {
    Lt,
    Lte,
    Eq,
    Gte,
    Gt,
    Ne,
}

impl NumericOp {
    /// Evaluates `lhs <op> rhs` with the type's native ordering.
    ///
    /// Unordered pairs (NaN) fail every relation except `Ne`.
    pub fn eval<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            NumericOp::Lt => lhs < rhs,
            NumericOp::Lte => lhs <= rhs,
            NumericOp::Eq => lhs == rhs,
            NumericOp::Gte => lhs >= rhs,
            NumericOp::Gt => lhs > rhs,
            NumericOp::Ne => lhs != rhs,
        }
    }
}

/// Operators legal on text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextOp {
    Contains,
    NotContains,
    Eq,
    Ne,
}

impl TextOp {
    /// Evaluates `lhs <op> rhs` on text.
    pub fn eval(self, lhs: &str, rhs: &str) -> bool {
        match self {
            TextOp::Contains => lhs.contains(rhs),
            TextOp::NotContains => !lhs.contains(rhs),
            TextOp::Eq => lhs == rhs,
            TextOp::Ne => lhs != rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn short_tokens_resolve() {
        assert_eq!(Op::from_token("c"), Some(Op::Contains));
        assert_eq!(Op::from_token("contain"), Some(Op::Contains));
        assert_eq!(Op::from_token("lt"), Some(Op::LessThan));
        assert_eq!(Op::from_token("lte"), Some(Op::LessEqual));
        assert_eq!(Op::from_token("eq"), Some(Op::Equal));
        assert_eq!(Op::from_token("gte"), Some(Op::GreaterEqual));
        assert_eq!(Op::from_token("gt"), Some(Op::GreaterThan));
        assert_eq!(Op::from_token("neq"), Some(Op::NotEqual));
        assert_eq!(Op::from_token("nc"), Some(Op::NotContains));
        assert_eq!(Op::from_token("notcontain"), Some(Op::NotContains));
    }

    #[test]
    fn canonical_names_resolve_to_themselves() {
        for op in Op::ALL {
            assert_eq!(Op::from_token(op.canonical()), Some(op));
        }
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(Op::from_token("unknown"), None);
        assert_eq!(Op::from_token(""), None);
        assert_eq!(Op::from_token(" lt"), None);
        assert_eq!(Op::from_token("LT"), None);
    }

    #[test]
    fn alias_sets_are_disjoint() {
        let mut seen = HashSet::new();
        for (_, tokens) in ALIASES {
            for token in *tokens {
                assert!(seen.insert(*token), "duplicate alias {token}");
            }
        }
        assert!(Op::Unknown.aliases().is_empty());
    }

    #[test]
    fn families_partition_the_catalog() {
        let numeric: Vec<Op> = Op::ALL.into_iter().filter(|op| op.numeric().is_some()).collect();
        let textual: Vec<Op> = Op::ALL.into_iter().filter(|op| op.textual().is_some()).collect();

        assert_eq!(
            numeric,
            vec![
                Op::LessThan,
                Op::LessEqual,
                Op::Equal,
                Op::GreaterEqual,
                Op::GreaterThan,
                Op::NotEqual
            ]
        );
        assert_eq!(
            textual,
            vec![Op::Contains, Op::Equal, Op::NotEqual, Op::NotContains]
        );
        assert!(Op::Unknown.numeric().is_none());
        assert!(Op::Unknown.textual().is_none());
    }

    #[test]
    fn numeric_eval() {
        assert!(NumericOp::Lt.eval(1, 2));
        assert!(!NumericOp::Lt.eval(2, 2));
        assert!(NumericOp::Lte.eval(2, 2));
        assert!(NumericOp::Eq.eval(2, 2));
        assert!(NumericOp::Gte.eval(3, 2));
        assert!(!NumericOp::Gt.eval(2, 2));
        assert!(NumericOp::Gt.eval(3, 2));
        assert!(NumericOp::Ne.eval(3, 2));
        assert!(!NumericOp::Ne.eval(2, 2));
    }

    #[test]
    fn numeric_eval_nan() {
        assert!(!NumericOp::Eq.eval(f64::NAN, f64::NAN));
        assert!(!NumericOp::Lte.eval(f64::NAN, 1.0));
        assert!(NumericOp::Ne.eval(f64::NAN, 1.0));
    }

    #[test]
    fn text_eval() {
        assert!(TextOp::Contains.eval("wzyao1", "wzyao"));
        assert!(!TextOp::Contains.eval("wzy", "wzyao"));
        assert!(TextOp::NotContains.eval("abc", "z"));
        assert!(TextOp::Eq.eval("abc", "abc"));
        assert!(!TextOp::Eq.eval("abc", "Abc"));
        assert!(TextOp::Ne.eval("abc", "Abc"));
        // Every string contains the empty string.
        assert!(TextOp::Contains.eval("", ""));
    }

    #[test]
    fn display_names() {
        assert_eq!(Op::LessThan.to_string(), "less than");
        assert_eq!(Op::NotContains.to_string(), "not contain");
        assert_eq!(Op::GreaterEqual.to_string(), "greater than or equal");
    }
}
