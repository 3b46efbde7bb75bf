//! Declarative form specifications.
//!
//! Extra forms can be described in JSON and loaded at startup:
//!
//! ```json
//! {
//!   "resource_type": "power-feed",
//!   "capabilities": ["quick_search", "tagging"],
//!   "fields": [
//!     {"name": "site_id", "kind": "multi_reference", "resource": "site"},
//!     {"name": "power_panel_id", "kind": "multi_reference", "resource": "power-panel",
//!      "query_params": {"site_id": "$site_id"}, "null_option": "None"},
//!     {"name": "status", "kind": "multi_choice", "choices": ["active", "planned"]}
//!   ],
//!   "fieldsets": [{"name": "Location", "fields": ["site_id", "power_panel_id"]}]
//! }
//! ```

use std::collections::BTreeMap;

use rackline_persistence::types::SortKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field::{Bound, Choice, FieldDeclaration, FieldKind, TextMatch};
use crate::form::capability::capability_by_name;
use crate::form::{FilterForm, FormBuilder};

/// Declarative description of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSpec {
    /// Resource type the form filters.
    pub resource_type: String,
    /// Capability names applied before the fields.
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Field declarations.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Display sections.
    #[serde(default)]
    pub fieldsets: Vec<FieldsetSpec>,
    /// Default ordering, e.g. `-created,label`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

/// Declarative description of a field.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Kind name, e.g. `multi_reference`.
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceSpec>,
    /// Candidate resource type for reference kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_attribute: Option<String>,
    /// Candidate attribute to `$field` placeholder or literal.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query_params: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_option: Option<String>,
    /// Compare text exactly instead of by substring.
    #[serde(default)]
    pub exact: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Decimal>,
}

/// A choice written either as a bare value or as `{value, label}`.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceSpec {
    Value(String),
    Labelled { value: String, label: String },
}

impl From<ChoiceSpec> for Choice {
    fn from(spec: ChoiceSpec) -> Self {
        match spec {
            ChoiceSpec::Value(value) => Choice::new(value.clone(), value),
            ChoiceSpec::Labelled { value, label } => Choice::new(value, label),
        }
    }
}

/// Declarative description of a fieldset.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldsetSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<String>,
}

impl FieldSpec {
    /// Converts the spec into a field declaration.
    pub fn into_declaration(self) -> Result<FieldDeclaration, ConfigError> {
        let kind: FieldKind = self
            .kind
            .parse()
            .map_err(|_| ConfigError::UnknownFieldKind {
                field: self.name.clone(),
                kind: self.kind.clone(),
            })?;

        let mut field = match (kind, self.resource) {
            (FieldKind::Reference, Some(resource)) => FieldDeclaration::reference(&self.name, resource),
            (FieldKind::MultiReference, Some(resource)) => {
                FieldDeclaration::multi_reference(&self.name, resource)
            }
            (FieldKind::Choice, _) => FieldDeclaration::choice(
                &self.name,
                self.choices.into_iter().map(Choice::from).collect(),
            ),
            (FieldKind::MultiChoice, _) => FieldDeclaration::multi_choice(
                &self.name,
                self.choices.into_iter().map(Choice::from).collect(),
            ),
            // Reference kinds without a resource fail the build check.
            (kind, _) => FieldDeclaration::new(&self.name, kind),
        };

        for (attribute, value) in &self.query_params {
            field = field.query_param(attribute, value);
        }
        if let Some(value_attribute) = self.value_attribute {
            field = field.value_attribute(value_attribute);
        }
        if let Some(label) = self.label {
            field = field.label(label);
        }
        if let Some(attribute) = self.attribute {
            field = field.attribute(attribute);
        }
        if let Some(bound) = self.bound {
            field = field.bound(bound);
        }
        if let Some(null_option) = self.null_option {
            field = field.null_option(null_option);
        }
        if let Some(min) = self.min_value {
            field = field.min_value(min);
        }
        if self.exact {
            field.text_match = TextMatch::Exact;
        }
        field.required = self.required;

        Ok(field)
    }
}

impl FormSpec {
    /// Converts the spec into a checked form.
    pub fn into_form(self) -> Result<FilterForm, ConfigError> {
        let mut builder = FormBuilder::new(&self.resource_type);

        for name in &self.capabilities {
            let capability = capability_by_name(name).ok_or_else(|| ConfigError::InvalidSpec {
                message: format!(
                    "unknown capability '{}' in form for {}",
                    name, self.resource_type
                ),
            })?;
            builder = builder.with(capability.as_ref());
        }

        for field in self.fields {
            builder = builder.field(field.into_declaration()?);
        }

        for fieldset in &self.fieldsets {
            let members: Vec<&str> = fieldset.fields.iter().map(String::as_str).collect();
            builder = match &fieldset.name {
                Some(name) => builder.fieldset(name, &members),
                None => builder.untitled_fieldset(&members),
            };
        }

        if let Some(ordering) = &self.ordering {
            let keys = SortKey::parse_list(ordering).map_err(|e| ConfigError::InvalidSpec {
                message: format!("ordering for {}: {}", self.resource_type, e),
            })?;
            if !keys.is_empty() {
                builder = builder.ordering(keys);
            }
        }

        builder.build()
    }
}

/// Parses a JSON array of form specs.
pub fn load_specs(json: &str) -> Result<Vec<FormSpec>, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::InvalidSpec {
        message: e.to_string(),
    })
}
