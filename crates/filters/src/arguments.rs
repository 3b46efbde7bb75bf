//! Argument surface of a form.
//!
//! Every field name, and every supported lookup variant, is accepted as a
//! query parameter or GraphQL argument. This module lists them with their
//! value shapes and describes a form for clients.

use serde::Serialize;

use crate::field::{Choice, FieldDeclaration, FieldKind};
use crate::form::{Dependency, FilterForm, Fieldset, HasDependencies, HasFields};
use crate::lookup::{LOOKUP_SEPARATOR, LookupSuffix};

/// Accepted value shape of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArgumentShape {
    /// One string.
    String,
    /// A list of strings.
    #[serde(rename = "[String]")]
    StringList,
    /// ISO-8601 datetime string.
    DateTime,
    /// Whole number.
    Int,
    /// Decimal number.
    Decimal,
    /// Boolean.
    Boolean,
}

impl ArgumentShape {
    fn for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text | FieldKind::Choice | FieldKind::Reference => ArgumentShape::String,
            FieldKind::MultiChoice | FieldKind::MultiReference => ArgumentShape::StringList,
            FieldKind::TriState => ArgumentShape::Boolean,
            FieldKind::Integer => ArgumentShape::Int,
            FieldKind::Decimal => ArgumentShape::Decimal,
            FieldKind::DateTime => ArgumentShape::DateTime,
        }
    }

    fn for_suffix(kind: FieldKind, suffix: LookupSuffix) -> Self {
        if suffix == LookupSuffix::Empty {
            ArgumentShape::Boolean
        } else if suffix.takes_set(kind) {
            ArgumentShape::StringList
        } else {
            Self::for_kind(kind)
        }
    }
}

/// One accepted argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    /// Parameter name.
    pub name: String,
    /// Accepted value shape.
    pub shape: ArgumentShape,
}

/// Lists every accepted argument of a form, in declaration order.
pub fn arguments(form: &FilterForm) -> Vec<Argument> {
    let mut args = Vec::new();
    for field in form.fields() {
        args.push(Argument {
            name: field.name.clone(),
            shape: ArgumentShape::for_kind(field.kind),
        });
        for suffix in LookupSuffix::supported_by(field) {
            args.push(Argument {
                name: format!("{}{}{}", field.name, LOOKUP_SEPARATOR, suffix),
                shape: ArgumentShape::for_suffix(field.kind, *suffix),
            });
        }
    }
    args
}

/// Client-facing description of a field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescription {
    /// Parameter name.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Input kind.
    pub kind: FieldKind,
    /// Value shape of the plain parameter.
    pub shape: ArgumentShape,
    /// Static choices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    /// Candidate resource type for reference fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Parent fields that restrict the candidates.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Label of the null option.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_option: Option<String>,
    /// Supported lookup suffixes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lookups: Vec<LookupSuffix>,
}

impl FieldDescription {
    fn new(form: &FilterForm, field: &FieldDeclaration) -> Self {
        Self {
            name: field.name.clone(),
            label: field.label.clone(),
            kind: field.kind,
            shape: ArgumentShape::for_kind(field.kind),
            choices: field.static_choices().map(<[Choice]>::to_vec),
            resource_type: field.resource_query().map(|q| q.resource_type.clone()),
            depends_on: form.parents_of(&field.name).into_iter().map(str::to_string).collect(),
            null_option: field.null_option.clone(),
            lookups: LookupSuffix::supported_by(field).to_vec(),
        }
    }
}

/// Client-facing description of a form.
#[derive(Debug, Clone, Serialize)]
pub struct FormDescription {
    /// Resource type the form filters.
    pub resource_type: String,
    /// Display sections.
    pub fieldsets: Vec<Fieldset>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescription>,
    /// Dependency edges.
    pub dependencies: Vec<Dependency>,
    /// Every accepted argument.
    pub arguments: Vec<Argument>,
}

impl FilterForm {
    /// Describes the form for clients.
    pub fn describe(&self) -> FormDescription {
        FormDescription {
            resource_type: self.resource_type().to_string(),
            fieldsets: self.fieldsets().to_vec(),
            fields: self
                .fields()
                .iter()
                .map(|f| FieldDescription::new(self, f))
                .collect(),
            dependencies: self.dependencies().edges().to_vec(),
            arguments: arguments(self),
        }
    }
}
