//! SphinxQL operator types and conversions

use std::fmt::{self, Display};

/// Relational operator used in WHERE and HAVING clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator(&'static str);

impl Operator {
    pub const EQ: Self = Operator("=");
    pub const NEQ: Self = Operator("!=");
    pub const LT: Self = Operator("<");
    pub const LTE: Self = Operator("<=");
    pub const GT: Self = Operator(">");
    pub const GTE: Self = Operator(">=");
    pub const IN: Self = Operator("IN");
    pub const NOT_IN: Self = Operator("NOT IN");
    pub const BETWEEN: Self = Operator("BETWEEN");
    pub const LIKE: Self = Operator("LIKE");
    pub const IS: Self = Operator("IS");
    pub const IS_NOT: Self = Operator("IS NOT");

    /// Create a custom operator for daemon-specific syntax
    ///
    /// # Examples
    /// ```
    /// use sphinxql_core::Operator;
    ///
    /// let any = Operator::custom("ANY");
    /// assert_eq!(any.as_str(), "ANY");
    /// ```
    pub const fn custom(op: &'static str) -> Self {
        Operator(op)
    }

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// `=` and `!=` compared against NULL become `IS` and `IS NOT`
    pub(crate) fn against_null(self) -> Self {
        match self {
            Self::EQ => Self::IS,
            Self::NEQ => Self::IS_NOT,
            other => other,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Trait for types that can be converted to operators
pub trait IntoOperator {
    fn into_operator(self) -> Operator;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Operator {
        self
    }
}

/// String literals map onto the known operators; anything else is passed
/// through as a custom operator.
impl IntoOperator for &'static str {
    fn into_operator(self) -> Operator {
        match self {
            "=" => Operator::EQ,
            "!=" | "<>" => Operator::NEQ,
            "<" => Operator::LT,
            "<=" => Operator::LTE,
            ">" => Operator::GT,
            ">=" => Operator::GTE,
            "IN" | "in" => Operator::IN,
            "NOT IN" | "not in" => Operator::NOT_IN,
            "BETWEEN" | "between" => Operator::BETWEEN,
            "LIKE" | "like" => Operator::LIKE,
            "IS" | "is" => Operator::IS,
            "IS NOT" | "is not" => Operator::IS_NOT,
            other => Operator::custom(other),
        }
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const EQ: Operator = Operator::EQ;
    pub const NEQ: Operator = Operator::NEQ;
    pub const LT: Operator = Operator::LT;
    pub const LTE: Operator = Operator::LTE;
    pub const GT: Operator = Operator::GT;
    pub const GTE: Operator = Operator::GTE;
    pub const IN: Operator = Operator::IN;
    pub const NOT_IN: Operator = Operator::NOT_IN;
    pub const BETWEEN: Operator = Operator::BETWEEN;
    pub const LIKE: Operator = Operator::LIKE;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_constants() {
        assert_eq!(Operator::GTE.as_str(), ">=");
        assert_eq!(Operator::NOT_IN.as_str(), "NOT IN");
        assert_eq!(Operator::BETWEEN.as_str(), "BETWEEN");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Operator::LT), "<");
        assert_eq!(format!("{}", Operator::IN), "IN");
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!("=".into_operator(), Operator::EQ);
        assert_eq!("<>".into_operator(), Operator::NEQ);
        assert_eq!("not in".into_operator(), Operator::NOT_IN);
        assert_eq!("between".into_operator(), Operator::BETWEEN);
    }

    #[test]
    fn test_unknown_string_is_custom() {
        assert_eq!("REGEX".into_operator(), Operator::custom("REGEX"));
    }

    #[test]
    fn test_null_rewrite() {
        assert_eq!(Operator::EQ.against_null(), Operator::IS);
        assert_eq!(Operator::NEQ.against_null(), Operator::IS_NOT);
        assert_eq!(Operator::GT.against_null(), Operator::GT);
    }
}
