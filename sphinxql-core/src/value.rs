//! Value types for SphinxQL literals

use crate::{Expression, QueryBuilder};

/// A value that is quoted into the statement text at compile time
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value, rendered as `'1'` / `'0'`
    Bool(bool),
    /// Integer value, rendered bare
    Int(i64),
    /// Floating point value, rendered in fixed notation
    Float(f64),
    /// String value, escaped and single-quoted
    String(String),
    /// List of values, used by `IN`, `BETWEEN` and MVA attributes
    List(Vec<Value>),
    /// Nested SELECT, rendered in parentheses
    SubQuery(Box<QueryBuilder>),
    /// Literal fragment with its own parameters
    Expr(Expression),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for values a form filter should ignore: NULL, blank strings and
    /// empty lists
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Extract list values if this is a List variant
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

macro_rules! int_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(val: $t) -> Self {
                    Value::Int(i64::from(val))
                }
            }
        )*
    };
}

int_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(val: f32) -> Self {
        Value::Float(f64::from(val))
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Float(val)
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::String(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::String(val.to_string())
    }
}

impl From<&String> for Value {
    fn from(val: &String) -> Self {
        Value::String(val.clone())
    }
}

impl From<Expression> for Value {
    fn from(val: Expression) -> Self {
        Value::Expr(val)
    }
}

impl From<QueryBuilder> for Value {
    fn from(val: QueryBuilder) -> Self {
        Value::SubQuery(Box::new(val))
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(vals: Vec<T>) -> Self {
        Value::List(vals.into_iter().map(Into::into).collect())
    }
}

impl<T> From<&[T]> for Value
where
    T: Clone + Into<Value>,
{
    fn from(vals: &[T]) -> Self {
        Value::List(vals.iter().cloned().map(Into::into).collect())
    }
}

impl<T, const N: usize> From<[T; N]> for Value
where
    T: Into<Value>,
{
    fn from(vals: [T; N]) -> Self {
        Value::List(vals.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// Timestamp attributes are stored as unix seconds
#[cfg(feature = "datetime-support")]
impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(val: chrono::DateTime<chrono::Utc>) -> Self {
        Value::Int(val.timestamp())
    }
}
