//! Built-in filter forms.
//!
//! Forms are grouped by application area. [`builtin_registry`] registers all
//! of them together with the types that are listed without a form.

pub mod choices;
pub mod core;
pub mod dcim;
pub mod extras;
pub mod tenancy;
pub mod virtualization;

use crate::error::ConfigError;
use crate::form::FilterForm;
use crate::registry::{FormRegistry, FormRegistryBuilder};

/// Types served by the list resolver without a filter form.
pub const UNFILTERED_TYPES: &[&str] = &["config-revision", "tagged-item"];

/// Builds every built-in form.
pub fn builtin_forms() -> Result<Vec<FilterForm>, ConfigError> {
    let mut forms = dcim::forms()?;
    forms.extend(tenancy::forms()?);
    forms.extend(extras::forms()?);
    forms.extend(self::core::forms()?);
    forms.extend(virtualization::forms()?);
    Ok(forms)
}

/// Registers the built-in forms and unfiltered types.
pub fn register_builtin(mut builder: FormRegistryBuilder) -> Result<FormRegistryBuilder, ConfigError> {
    for form in builtin_forms()? {
        builder = builder.register(form)?;
    }
    for resource_type in UNFILTERED_TYPES {
        builder = builder.register_unfiltered(*resource_type)?;
    }
    Ok(builder)
}

/// Returns a registry holding only the built-in types.
pub fn builtin_registry() -> Result<FormRegistry, ConfigError> {
    Ok(register_builtin(FormRegistry::builder())?.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.len(), 34);
        assert_eq!(registry.forms().count(), 32);
        for resource_type in ["site", "rack", "device", "virtual-machine", "job", "tag"] {
            assert!(registry.form(resource_type).is_some(), "{}", resource_type);
        }
        assert!(registry.contains("tagged-item"));
        assert!(registry.form("config-revision").is_none());
    }

    #[test]
    fn test_builtin_twice_is_rejected() {
        let builder = register_builtin(FormRegistry::builder()).unwrap();
        assert!(matches!(
            register_builtin(builder),
            Err(ConfigError::DuplicateResourceType { .. })
        ));
    }
}
