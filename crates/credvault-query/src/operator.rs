use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::QueryError;

/// Comparison operators accepted in subject conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `$eq`: stored value equals the operand.
    Eq,
    /// `$lt`: stored value is strictly less than the operand.
    Lt,
    /// `$gt`: stored value is strictly greater than the operand.
    Gt,
    /// `$in`: stored value is a member of the operand list.
    In,
    /// `$nin`: stored value is not a member of the operand list.
    Nin,
}

impl Operator {
    /// Every recognized operator.
    pub const ALL: [Operator; 5] = [
        Operator::Eq,
        Operator::Lt,
        Operator::Gt,
        Operator::In,
        Operator::Nin,
    ];

    /// Wire key of the operator (e.g. `$eq`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "$eq",
            Self::Lt => "$lt",
            Self::Gt => "$gt",
            Self::In => "$in",
            Self::Nin => "$nin",
        }
    }

    /// Apply the operator to a stored subject value.
    ///
    /// A missing field (`None`) satisfies only `$nin`. Only `$eq` looks inside
    /// a stored array; the other operators compare the array as a whole.
    pub fn apply(&self, stored: Option<&Value>, operand: &Value) -> bool {
        match self {
            Self::Eq => stored.is_some_and(|v| {
                values_equal(v, operand)
                    || v.as_array()
                        .is_some_and(|items| items.iter().any(|item| values_equal(item, operand)))
            }),
            Self::Lt => compare_numbers(stored, operand, |a, b| a < b),
            Self::Gt => compare_numbers(stored, operand, |a, b| a > b),
            Self::In => stored.is_some_and(|v| operand_list(operand).iter().any(|o| values_equal(v, o))),
            Self::Nin => {
                stored.map_or(true, |v| !operand_list(operand).iter().any(|o| values_equal(v, o)))
            }
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| QueryError::NotDefinedComparator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One comparison applied to one subject field.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectCondition {
    /// Comparison to perform.
    pub operator: Operator,
    /// Right-hand side of the comparison.
    pub operand: Value,
}

impl SubjectCondition {
    /// Create a condition.
    pub fn new(operator: Operator, operand: Value) -> Self {
        Self { operator, operand }
    }

    /// Equality condition, the meaning of a bare literal in a query.
    pub fn eq(operand: Value) -> Self {
        Self::new(Operator::Eq, operand)
    }

    /// Evaluate against the stored field value, if present.
    pub fn evaluate(&self, stored: Option<&Value>) -> bool {
        self.operator.apply(stored, &self.operand)
    }
}

/// JSON equality, with numbers compared by value (`120` equals `120.0`).
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Numeric view of a value: numbers, numeric strings and booleans.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn compare_numbers(stored: Option<&Value>, operand: &Value, cmp: fn(f64, f64) -> bool) -> bool {
    match (stored.and_then(as_number), as_number(operand)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// `$in`/`$nin` operands are lists; a scalar is treated as a one-element list.
fn operand_list(operand: &Value) -> &[Value] {
    match operand {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}
