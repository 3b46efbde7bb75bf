//! Registered resource types and their filter forms.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::error::ConfigError;
use crate::form::FilterForm;

/// Resource types known to the resolver, each with an optional form.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    entries: BTreeMap<String, Option<Arc<FilterForm>>>,
}

impl FormRegistry {
    /// Starts an empty registry.
    pub fn builder() -> FormRegistryBuilder {
        FormRegistryBuilder::default()
    }

    /// Returns true if the resource type is registered.
    pub fn contains(&self, resource_type: &str) -> bool {
        self.entries.contains_key(resource_type)
    }

    /// Returns the form of a registered type.
    ///
    /// `None` for unknown types and for types registered without a form;
    /// use [`contains`](Self::contains) to tell them apart.
    pub fn form(&self, resource_type: &str) -> Option<&Arc<FilterForm>> {
        self.entries.get(resource_type)?.as_ref()
    }

    /// Returns the registered types in name order.
    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the forms in resource type order.
    pub fn forms(&self) -> impl Iterator<Item = &Arc<FilterForm>> {
        self.entries.values().flatten()
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects registrations and rejects duplicates.
#[derive(Debug, Default)]
pub struct FormRegistryBuilder {
    entries: BTreeMap<String, Option<Arc<FilterForm>>>,
}

impl FormRegistryBuilder {
    /// Registers a type with its form.
    pub fn register(self, form: FilterForm) -> Result<Self, ConfigError> {
        let resource_type = form.resource_type().to_string();
        self.insert(resource_type, Some(Arc::new(form)))
    }

    /// Registers a type that has no filter form.
    pub fn register_unfiltered(self, resource_type: impl Into<String>) -> Result<Self, ConfigError> {
        self.insert(resource_type.into(), None)
    }

    fn insert(mut self, resource_type: String, form: Option<Arc<FilterForm>>) -> Result<Self, ConfigError> {
        if self.entries.contains_key(&resource_type) {
            return Err(ConfigError::DuplicateResourceType { resource_type });
        }
        self.entries.insert(resource_type, form);
        Ok(self)
    }

    /// Finishes the registry.
    pub fn build(self) -> FormRegistry {
        let forms = self.entries.values().filter(|f| f.is_some()).count();
        info!(
            resource_types = self.entries.len(),
            forms,
            "Form registry built"
        );
        FormRegistry {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDeclaration;
    use crate::form::FormBuilder;

    fn form(resource_type: &str) -> FilterForm {
        FormBuilder::new(resource_type)
            .field(FieldDeclaration::text("serial"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = FormRegistry::builder()
            .register(form("rack"))
            .unwrap()
            .register_unfiltered("config-revision")
            .unwrap()
            .build();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("config-revision"));
        assert!(registry.form("config-revision").is_none());
        assert!(registry.form("rack").is_some());
        assert!(!registry.contains("device"));
        assert_eq!(
            registry.resource_types().collect::<Vec<_>>(),
            vec!["config-revision", "rack"]
        );
        assert_eq!(registry.forms().count(), 1);
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let err = FormRegistry::builder()
            .register(form("rack"))
            .unwrap()
            .register_unfiltered("rack")
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateResourceType {
                resource_type: "rack".into()
            }
        );
    }
}
