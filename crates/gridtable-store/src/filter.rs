//! Filter expressions: equality predicates combined with AND.
//!
//! A `Filter` is an immutable predicate tree. Leaves are `(field, value)`
//! equality terms; interior nodes are AND. The tree renders to the
//! backend's textual grammar through `Display` and can also be evaluated
//! directly against a record's property bag, which is how the embedded
//! memory backend applies it. No field-name validation happens here; an
//! unknown field simply never matches.

use gridtable_commons::Record;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `field eq 'value'`. Values are compared as strings; scalar
    /// properties are stringified before the comparison and null or
    /// missing properties never match.
    Equal { field: String, value: String },

    /// `(left) and (right)`.
    And(Box<Filter>, Box<Filter>),
}

impl Filter {
    /// Builds a single equality predicate on `field`.
    pub fn equal(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Equal {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Chains `self` and `other` with AND.
    pub fn and(self, other: Filter) -> Self {
        Filter::And(Box::new(self), Box::new(other))
    }

    /// Combines filters into one left-associative AND chain.
    ///
    /// Absent entries are dropped. Zero survivors yield `None`, a single
    /// survivor is returned unchanged, and more are chained in input
    /// order, so the rendered text is deterministic for a given input
    /// order. Clause order is preserved because some backends pick
    /// indexes based on it.
    pub fn combine<I>(filters: I) -> Option<Filter>
    where
        I: IntoIterator<Item = Option<Filter>>,
    {
        let mut present = filters.into_iter().flatten();
        let first = present.next()?;
        Some(present.fold(first, Filter::and))
    }

    /// Evaluates the predicate against a record's property bag.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Equal { field, value } => match record.get(field) {
                Some(property) => property_as_string(property).as_deref() == Some(value.as_str()),
                None => false,
            },
            Filter::And(left, right) => left.matches(record) && right.matches(record),
        }
    }
}

/// Stringifies a scalar property for equality comparison. Nulls and
/// structured values have no string form and never match.
fn property_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Equal { field, value } => {
                write!(f, "{} eq '{}'", field, value.replace('\'', "''"))
            }
            Filter::And(left, right) => write!(f, "({}) and ({})", left, right),
        }
    }
}
