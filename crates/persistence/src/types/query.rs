//! Store queries: predicates, ordering, and pagination for one resource type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pagination::Pagination;
use super::predicate::{Predicate, validate_attribute_name};
use crate::error::QueryError;

/// One ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    /// The attribute to order by.
    pub field: String,
    /// Whether the order is descending.
    pub descending: bool,
}

impl SortKey {
    /// Ascending order on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    /// Descending order on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Parses a comma-separated ordering such as `-status,label`.
    pub fn parse_list(s: &str) -> Result<Vec<SortKey>, QueryError> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(SortKey::from_str)
            .collect()
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, descending) = match s.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        validate_attribute_name(field)?;
        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// Default ordering: by label, then by id.
pub fn default_ordering() -> Vec<SortKey> {
    vec![SortKey::asc("label"), SortKey::asc("id")]
}

/// A query against one resource type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreQuery {
    /// The resource type to read.
    pub resource_type: String,

    /// AND-combined predicates.
    #[serde(default)]
    pub predicates: Vec<Predicate>,

    /// Ordering keys. Ties are broken by id.
    #[serde(default = "default_ordering")]
    pub ordering: Vec<SortKey>,

    /// Which slice to return.
    #[serde(default)]
    pub pagination: Pagination,

    /// Whether to compute the total number of matches.
    #[serde(default)]
    pub include_total: bool,
}

impl StoreQuery {
    /// Creates an unfiltered, default-ordered query.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            predicates: Vec::new(),
            ordering: default_ordering(),
            pagination: Pagination::default(),
            include_total: false,
        }
    }

    /// Adds a predicate.
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Replaces the predicates.
    pub fn with_predicates(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates = predicates;
        self
    }

    /// Replaces the ordering. An empty list keeps the default ordering.
    pub fn with_ordering(mut self, ordering: Vec<SortKey>) -> Self {
        if !ordering.is_empty() {
            self.ordering = ordering;
        }
        self
    }

    /// Sets the pagination.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Requests the total match count.
    pub fn with_total(mut self) -> Self {
        self.include_total = true;
        self
    }

    /// Checks every predicate and ordering key.
    pub fn check(&self) -> Result<(), QueryError> {
        for predicate in &self.predicates {
            predicate.check()?;
        }
        for key in &self.ordering {
            validate_attribute_name(&key.field)?;
        }
        Ok(())
    }
}
