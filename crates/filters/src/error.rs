//! Error types for filter forms and list resolution.
//!
//! Three categories are kept apart:
//!
//! - [`ConfigError`] - a form or registry declaration is malformed; raised
//!   while building, never while serving a request
//! - [`FieldErrors`] - submitted filter input failed validation; collected
//!   per field so every problem is reported at once
//! - [`ResolveError`] - a resolution request could not be answered

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::fmt;

use rackline_persistence::error::{QueryError, StorageError};
use serde::Serialize;
use thiserror::Error;

/// A malformed form or registry declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Two fields share a name.
    #[error("duplicate field '{field}' in form for {resource_type}")]
    DuplicateField {
        resource_type: String,
        field: String,
    },

    /// A dependency names a field the form does not declare.
    #[error("field '{field}' depends on undeclared field '{parent}'")]
    UndeclaredDependency { field: String, parent: String },

    /// The dependency graph contains a cycle.
    #[error("cyclic dependency: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// A parent field cannot supply values to restrict a dependent query.
    #[error("field '{field}' depends on '{parent}', which is a {kind} field")]
    InvalidParentKind {
        field: String,
        parent: String,
        kind: String,
    },

    /// A placeholder is not of the form `$<field>`.
    #[error("invalid placeholder '{value}' on field '{field}'")]
    InvalidPlaceholder { field: String, value: String },

    /// A field kind name is not recognised.
    #[error("unknown field kind '{kind}' for field '{field}'")]
    UnknownFieldKind { field: String, kind: String },

    /// A field kind needs a choice source it was not given.
    #[error("field '{field}' of kind {kind} has no usable choice source")]
    MissingChoiceSource { field: String, kind: String },

    /// A fieldset lists a field the form does not declare.
    #[error("fieldset '{fieldset}' lists undeclared field '{field}'")]
    UndeclaredFieldsetMember { fieldset: String, field: String },

    /// Filter fields are always optional.
    #[error("filter field '{field}' cannot be required")]
    RequiredFilterField { field: String },

    /// An attribute name is not a plain identifier.
    #[error("field '{field}' targets invalid attribute '{attribute}'")]
    InvalidAttribute { field: String, attribute: String },

    /// A resource type is registered twice.
    #[error("resource type '{resource_type}' is already registered")]
    DuplicateResourceType { resource_type: String },

    /// A declarative form spec could not be parsed.
    #[error("invalid form spec: {message}")]
    InvalidSpec { message: String },
}

/// Field-scoped validation errors, keyed by parameter name.
///
/// Serializes as a JSON object mapping each parameter to its messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for a parameter.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Returns true if no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of parameters with errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the messages for one parameter.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns true if the parameter has errors.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterates over parameters and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Consumes the error set.
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Errors raised while resolving lists, single records, or choices.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The resource type is not registered.
    #[error("unknown resource type: {resource_type}")]
    UnknownResourceType { resource_type: String },

    /// The form does not declare the field.
    #[error("unknown filter field '{field}' for {resource_type}")]
    UnknownField {
        resource_type: String,
        field: String,
    },

    /// The field has no candidate choices (e.g. free text).
    #[error("field '{field}' of {resource_type} does not offer choices")]
    NotAChoiceField {
        resource_type: String,
        field: String,
    },

    /// Submitted filters failed validation.
    #[error("invalid filters: {0}")]
    InvalidFilters(FieldErrors),

    /// Caller-supplied ordering could not be applied.
    #[error("invalid ordering: {0}")]
    InvalidOrdering(QueryError),

    /// A single-record lookup matched nothing.
    #[error("{resource_type} not found: {criteria}")]
    NotFound {
        resource_type: String,
        criteria: String,
    },

    /// A single-record lookup matched more than one record.
    #[error("{resource_type} lookup is ambiguous: {criteria} matched more than one record")]
    AmbiguousResult {
        resource_type: String,
        criteria: String,
    },

    /// The store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type alias for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

impl From<FieldErrors> for ResolveError {
    fn from(errors: FieldErrors) -> Self {
        ResolveError::InvalidFilters(errors)
    }
}
