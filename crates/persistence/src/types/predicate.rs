//! Storage-agnostic filter predicates.
//!
//! A store query carries a list of predicates that are AND-combined. OR only
//! appears inside a single [`Lookup::In`] membership set.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

static ATTRIBUTE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("attribute name pattern is valid")
});

/// Checks that an attribute name is a plain identifier.
pub fn validate_attribute_name(name: &str) -> Result<(), QueryError> {
    if ATTRIBUTE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(QueryError::InvalidAttribute {
            name: name.to_string(),
        })
    }
}

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    /// Equality (case-sensitive for text).
    Exact,
    /// Case-insensitive equality.
    IExact,
    /// Case-insensitive substring.
    IContains,
    /// Case-insensitive prefix.
    IStartsWith,
    /// Case-insensitive suffix.
    IEndsWith,
    /// Membership in a set of values.
    In,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Missing or null (boolean operand).
    IsNull,
    /// Missing, null, empty string, or empty array (boolean operand).
    Empty,
    /// Free-text search over the label, the id, and every text attribute.
    Search,
}

impl Lookup {
    /// Returns the lookup name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lookup::Exact => "exact",
            Lookup::IExact => "iexact",
            Lookup::IContains => "icontains",
            Lookup::IStartsWith => "istartswith",
            Lookup::IEndsWith => "iendswith",
            Lookup::In => "in",
            Lookup::Gt => "gt",
            Lookup::Gte => "gte",
            Lookup::Lt => "lt",
            Lookup::Lte => "lte",
            Lookup::IsNull => "isnull",
            Lookup::Empty => "empty",
            Lookup::Search => "search",
        }
    }

    /// Returns true for the case-insensitive text lookups.
    pub fn is_text_pattern(&self) -> bool {
        matches!(
            self,
            Lookup::IExact | Lookup::IContains | Lookup::IStartsWith | Lookup::IEndsWith
        )
    }

    /// Returns true for the ordering comparisons.
    pub fn is_range(&self) -> bool {
        matches!(self, Lookup::Gt | Lookup::Gte | Lookup::Lt | Lookup::Lte)
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lookup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Lookup::Exact),
            "iexact" => Ok(Lookup::IExact),
            "icontains" => Ok(Lookup::IContains),
            "istartswith" => Ok(Lookup::IStartsWith),
            "iendswith" => Ok(Lookup::IEndsWith),
            "in" => Ok(Lookup::In),
            "gt" => Ok(Lookup::Gt),
            "gte" => Ok(Lookup::Gte),
            "lt" => Ok(Lookup::Lt),
            "lte" => Ok(Lookup::Lte),
            "isnull" => Ok(Lookup::IsNull),
            "empty" => Ok(Lookup::Empty),
            "search" => Ok(Lookup::Search),
            _ => Err(format!("Unknown lookup: {}", s)),
        }
    }
}

/// Comparison value of a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PredicateValue {
    /// Text value.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Decimal number.
    Decimal(Decimal),
    /// Boolean.
    Boolean(bool),
    /// Point in time (UTC).
    DateTime(DateTime<Utc>),
    /// The absence of a value.
    Null,
    /// Set of values for membership lookups.
    Set(Vec<PredicateValue>),
}

impl PredicateValue {
    /// Creates a text value.
    pub fn text(s: impl Into<String>) -> Self {
        PredicateValue::Text(s.into())
    }

    /// Creates a set of text values.
    pub fn text_set<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        PredicateValue::Set(values.into_iter().map(|v| PredicateValue::Text(v.into())).collect())
    }

    /// Returns the kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PredicateValue::Text(_) => "text",
            PredicateValue::Integer(_) => "integer",
            PredicateValue::Decimal(_) => "decimal",
            PredicateValue::Boolean(_) => "boolean",
            PredicateValue::DateTime(_) => "datetime",
            PredicateValue::Null => "null",
            PredicateValue::Set(_) => "set",
        }
    }
}

/// A single filter constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    /// The attribute the predicate compares.
    pub field: String,
    /// The comparison operator.
    pub lookup: Lookup,
    /// The comparison value.
    pub value: PredicateValue,
    /// Whether the predicate is inverted.
    #[serde(default)]
    pub negated: bool,
}

impl Predicate {
    /// Creates a predicate.
    pub fn new(field: impl Into<String>, lookup: Lookup, value: PredicateValue) -> Self {
        Self {
            field: field.into(),
            lookup,
            value,
            negated: false,
        }
    }

    /// Creates an equality predicate.
    pub fn exact(field: impl Into<String>, value: PredicateValue) -> Self {
        Self::new(field, Lookup::Exact, value)
    }

    /// Creates a membership predicate.
    pub fn one_of(field: impl Into<String>, values: Vec<PredicateValue>) -> Self {
        Self::new(field, Lookup::In, PredicateValue::Set(values))
    }

    /// Creates a case-insensitive substring predicate.
    pub fn contains(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(field, Lookup::IContains, PredicateValue::Text(text.into()))
    }

    /// Creates a free-text search predicate.
    pub fn search(text: impl Into<String>) -> Self {
        Self::new("q", Lookup::Search, PredicateValue::Text(text.into()))
    }

    /// Inverts the predicate.
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Checks that the lookup accepts the comparison value.
    ///
    /// Search predicates ignore their field name; every other predicate must
    /// name a plain identifier.
    pub fn check(&self) -> Result<(), QueryError> {
        if self.lookup != Lookup::Search {
            validate_attribute_name(&self.field)?;
        }

        let accepted = match (&self.lookup, &self.value) {
            (Lookup::Exact, PredicateValue::Set(_)) => false,
            (Lookup::Exact, _) => true,
            (Lookup::In, PredicateValue::Set(members)) => members
                .iter()
                .all(|m| !matches!(m, PredicateValue::Set(_))),
            (Lookup::In, _) => false,
            (l, PredicateValue::Text(_)) if l.is_text_pattern() => true,
            (l, _) if l.is_text_pattern() => false,
            (
                l,
                PredicateValue::Text(_)
                | PredicateValue::Integer(_)
                | PredicateValue::Decimal(_)
                | PredicateValue::DateTime(_),
            ) if l.is_range() => true,
            (l, _) if l.is_range() => false,
            (Lookup::IsNull | Lookup::Empty, PredicateValue::Boolean(_)) => true,
            (Lookup::Search, PredicateValue::Text(_)) => true,
            _ => false,
        };

        if accepted {
            Ok(())
        } else {
            Err(QueryError::UnsupportedLookup {
                field: self.field.clone(),
                lookup: self.lookup.to_string(),
                value_kind: self.value.kind().to_string(),
            })
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "NOT ")?;
        }
        write!(f, "{}__{} {:?}", self.field, self.lookup, self.value)
    }
}
