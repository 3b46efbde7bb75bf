//! Filter forms.
//!
//! A [`FilterForm`] is the validated, immutable set of filter fields for one
//! resource type. Forms are assembled with a [`FormBuilder`], optionally from
//! reusable [`FilterCapability`] groups, or loaded from a declarative
//! [`FormSpec`].

mod builder;
pub mod capability;
pub mod graph;
pub mod spec;

use std::collections::HashMap;

use rackline_persistence::types::SortKey;
use serde::{Deserialize, Serialize};

use crate::field::FieldDeclaration;

pub use builder::FormBuilder;
pub use capability::{Contacts, FilterCapability, LocalConfigContext, QuickSearch, Tagging, Tenancy};
pub use graph::{Dependency, DependencyGraph};
pub use spec::{FieldSpec, FieldsetSpec, FormSpec, load_specs};

/// A display section of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fieldset {
    /// Section heading; `None` for the leading untitled section.
    pub name: Option<String>,
    /// Member field names, in display order.
    pub fields: Vec<String>,
}

impl Fieldset {
    /// Creates a titled section.
    pub fn named(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: Some(name.into()),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Creates an untitled section.
    pub fn untitled(fields: &[&str]) -> Self {
        Self {
            name: None,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Access to a form's field declarations.
pub trait HasFields {
    /// Returns all fields in declaration order.
    fn fields(&self) -> &[FieldDeclaration];

    /// Returns a field by name.
    fn field(&self, name: &str) -> Option<&FieldDeclaration> {
        self.fields().iter().find(|f| f.name == name)
    }
}

/// Access to a form's dependency graph.
pub trait HasDependencies {
    /// Returns the dependency graph.
    fn dependencies(&self) -> &DependencyGraph;

    /// Returns the parent field names of a field.
    fn parents_of<'a>(&'a self, field: &'a str) -> Vec<&'a str> {
        self.dependencies()
            .parents(field)
            .map(|d| d.parent.as_str())
            .collect()
    }
}

/// The filter fields of one resource type.
#[derive(Debug, Clone)]
pub struct FilterForm {
    resource_type: String,
    fields: Vec<FieldDeclaration>,
    index: HashMap<String, usize>,
    fieldsets: Vec<Fieldset>,
    graph: DependencyGraph,
    ordering: Vec<SortKey>,
    capabilities: Vec<&'static str>,
}

impl FilterForm {
    /// Starts building a form for a resource type.
    pub fn builder(resource_type: impl Into<String>) -> FormBuilder {
        FormBuilder::new(resource_type)
    }

    /// Returns the resource type this form filters.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns the display sections.
    pub fn fieldsets(&self) -> &[Fieldset] {
        &self.fieldsets
    }

    /// Returns the default ordering.
    pub fn ordering(&self) -> &[SortKey] {
        &self.ordering
    }

    /// Returns the names of the applied capabilities.
    pub fn capabilities(&self) -> &[&'static str] {
        &self.capabilities
    }

    /// Returns the declaration index of a field.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

impl HasFields for FilterForm {
    fn fields(&self) -> &[FieldDeclaration] {
        &self.fields
    }

    fn field(&self, name: &str) -> Option<&FieldDeclaration> {
        self.index.get(name).map(|&i| &self.fields[i])
    }
}

impl HasDependencies for FilterForm {
    fn dependencies(&self) -> &DependencyGraph {
        &self.graph
    }
}
