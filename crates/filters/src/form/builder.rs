use std::collections::{HashMap, HashSet};

use rackline_persistence::types::{SortKey, default_ordering, validate_attribute_name};
use tracing::debug;

use crate::error::ConfigError;
use crate::field::{ChoiceSource, FieldDeclaration, ParamValue};
use crate::form::{DependencyGraph, FilterCapability, FilterForm, Fieldset};

/// Assembles and checks a [`FilterForm`].
///
/// # Example
///
/// ```rust,ignore
/// let form = FormBuilder::new("site")
///     .with(&QuickSearch)
///     .field(FieldDeclaration::multi_reference("region_id", "region"))
///     .field(FieldDeclaration::multi_reference("site_id", "site").depends_on("region_id", "region_id"))
///     .fieldset("Location", &["region_id", "site_id"])
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct FormBuilder {
    resource_type: String,
    fields: Vec<FieldDeclaration>,
    fieldsets: Vec<Fieldset>,
    ordering: Option<Vec<SortKey>>,
    capabilities: Vec<&'static str>,
}

impl FormBuilder {
    /// Creates an empty builder.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            fields: Vec::new(),
            fieldsets: Vec::new(),
            ordering: None,
            capabilities: Vec::new(),
        }
    }

    /// Adds the fields and fieldsets of a capability.
    pub fn with<C: FilterCapability + ?Sized>(mut self, capability: &C) -> Self {
        self.capabilities.push(capability.name());
        self.fields.extend(capability.fields());
        for fieldset in capability.fieldsets() {
            self.merge_fieldset(fieldset);
        }
        self
    }

    /// Adds a field.
    pub fn field(mut self, field: FieldDeclaration) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a titled section, merging with an existing one of the same name.
    pub fn fieldset(mut self, name: &str, fields: &[&str]) -> Self {
        self.merge_fieldset(Fieldset::named(name, fields));
        self
    }

    /// Adds members to the untitled section.
    pub fn untitled_fieldset(mut self, fields: &[&str]) -> Self {
        self.merge_fieldset(Fieldset::untitled(fields));
        self
    }

    /// Sets the default ordering.
    pub fn ordering(mut self, ordering: Vec<SortKey>) -> Self {
        self.ordering = Some(ordering);
        self
    }

    fn merge_fieldset(&mut self, fieldset: Fieldset) {
        match self.fieldsets.iter_mut().find(|f| f.name == fieldset.name) {
            Some(existing) => {
                for member in fieldset.fields {
                    if !existing.fields.contains(&member) {
                        existing.fields.push(member);
                    }
                }
            }
            None => self.fieldsets.push(fieldset),
        }
    }

    /// Checks the declaration and builds the form.
    pub fn build(self) -> Result<FilterForm, ConfigError> {
        let mut index = HashMap::with_capacity(self.fields.len());
        for (i, field) in self.fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(ConfigError::DuplicateField {
                    resource_type: self.resource_type.clone(),
                    field: field.name.clone(),
                });
            }
        }

        for field in &self.fields {
            check_field(field)?;
        }

        for fieldset in &self.fieldsets {
            let mut seen = HashSet::new();
            for member in &fieldset.fields {
                if !index.contains_key(member) || !seen.insert(member) {
                    return Err(ConfigError::UndeclaredFieldsetMember {
                        fieldset: fieldset.name.clone().unwrap_or_default(),
                        field: member.clone(),
                    });
                }
            }
        }

        for field in &self.fields {
            for (parent, _) in field.parents() {
                let Some(&p) = index.get(parent) else {
                    return Err(ConfigError::UndeclaredDependency {
                        field: field.name.clone(),
                        parent: parent.to_string(),
                    });
                };
                let parent_kind = self.fields[p].kind;
                if !parent_kind.can_be_parent() {
                    return Err(ConfigError::InvalidParentKind {
                        field: field.name.clone(),
                        parent: parent.to_string(),
                        kind: parent_kind.to_string(),
                    });
                }
            }
        }

        let graph = DependencyGraph::build(&self.fields)?;

        debug!(
            resource_type = %self.resource_type,
            fields = self.fields.len(),
            edges = graph.edges().len(),
            "Built filter form"
        );

        Ok(FilterForm {
            resource_type: self.resource_type,
            fields: self.fields,
            index,
            fieldsets: self.fieldsets,
            graph,
            ordering: self.ordering.unwrap_or_else(default_ordering),
            capabilities: self.capabilities,
        })
    }
}

/// Checks one field in isolation.
fn check_field(field: &FieldDeclaration) -> Result<(), ConfigError> {
    if field.required {
        return Err(ConfigError::RequiredFilterField {
            field: field.name.clone(),
        });
    }

    let invalid_attribute = |attribute: &str| ConfigError::InvalidAttribute {
        field: field.name.clone(),
        attribute: attribute.to_string(),
    };
    validate_attribute_name(&field.attribute).map_err(|_| invalid_attribute(&field.attribute))?;

    let missing_source = || ConfigError::MissingChoiceSource {
        field: field.name.clone(),
        kind: field.kind.to_string(),
    };
    match &field.choices {
        ChoiceSource::Static { choices } if field.kind.is_static_choice() => {
            if choices.is_empty() {
                return Err(missing_source());
            }
        }
        ChoiceSource::Resource(query) if field.kind.is_reference() => {
            validate_attribute_name(&query.value_attribute)
                .map_err(|_| invalid_attribute(&query.value_attribute))?;
            for param in &query.query_params {
                validate_attribute_name(&param.attribute)
                    .map_err(|_| invalid_attribute(&param.attribute))?;
                if let ParamValue::Field(parent) = &param.value
                    && parent.is_empty()
                {
                    return Err(ConfigError::InvalidPlaceholder {
                        field: field.name.clone(),
                        value: param.value.to_string(),
                    });
                }
            }
        }
        ChoiceSource::None if !field.kind.is_static_choice() && !field.kind.is_reference() => {}
        _ => return Err(missing_source()),
    }

    Ok(())
}
