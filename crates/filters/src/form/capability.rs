//! Reusable field groups shared by many forms.
//!
//! A capability contributes fields and named fieldsets to a form. Sections
//! with the same name merge when several capabilities (or the form itself)
//! contribute to them.

use crate::field::FieldDeclaration;
use crate::form::Fieldset;

/// A reusable group of filter fields.
pub trait FilterCapability {
    /// Returns the capability name (used by declarative specs).
    fn name(&self) -> &'static str;

    /// Returns the contributed fields.
    fn fields(&self) -> Vec<FieldDeclaration>;

    /// Returns the contributed fieldsets.
    fn fieldsets(&self) -> Vec<Fieldset>;
}

/// Free-text search over the whole record (`q`).
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickSearch;

impl FilterCapability for QuickSearch {
    fn name(&self) -> &'static str {
        "quick_search"
    }

    fn fields(&self) -> Vec<FieldDeclaration> {
        vec![FieldDeclaration::search("q")]
    }

    fn fieldsets(&self) -> Vec<Fieldset> {
        vec![Fieldset::untitled(&["q"])]
    }
}

/// Filtering by tag slug (`tag`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Tagging;

impl FilterCapability for Tagging {
    fn name(&self) -> &'static str {
        "tagging"
    }

    fn fields(&self) -> Vec<FieldDeclaration> {
        vec![
            FieldDeclaration::multi_reference("tag", "tag")
                .label("Tags")
                .attribute("tags")
                .value_attribute("slug"),
        ]
    }

    fn fieldsets(&self) -> Vec<Fieldset> {
        vec![Fieldset::untitled(&["tag"])]
    }
}

/// Tenant group and tenant, with tenants narrowed by group.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tenancy;

impl FilterCapability for Tenancy {
    fn name(&self) -> &'static str {
        "tenancy"
    }

    fn fields(&self) -> Vec<FieldDeclaration> {
        vec![
            FieldDeclaration::multi_reference("tenant_group_id", "tenant-group")
                .label("Tenant group")
                .null_option("None"),
            FieldDeclaration::multi_reference("tenant_id", "tenant")
                .label("Tenant")
                .null_option("None")
                .depends_on("group_id", "tenant_group_id"),
        ]
    }

    fn fieldsets(&self) -> Vec<Fieldset> {
        vec![Fieldset::named("Tenant", &["tenant_group_id", "tenant_id"])]
    }
}

/// Assigned contacts, contact roles, and contact groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct Contacts;

impl FilterCapability for Contacts {
    fn name(&self) -> &'static str {
        "contacts"
    }

    fn fields(&self) -> Vec<FieldDeclaration> {
        vec![
            FieldDeclaration::multi_reference("contact", "contact")
                .label("Contact")
                .attribute("contacts"),
            FieldDeclaration::multi_reference("contact_role", "contact-role")
                .label("Contact Role")
                .attribute("contact_roles"),
            FieldDeclaration::multi_reference("contact_group", "contact-group")
                .label("Contact Group")
                .attribute("contact_groups"),
        ]
    }

    fn fieldsets(&self) -> Vec<Fieldset> {
        vec![Fieldset::named(
            "Contacts",
            &["contact", "contact_role", "contact_group"],
        )]
    }
}

/// Presence of local config context data.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalConfigContext;

impl FilterCapability for LocalConfigContext {
    fn name(&self) -> &'static str {
        "local_config_context"
    }

    fn fields(&self) -> Vec<FieldDeclaration> {
        vec![FieldDeclaration::tri_state("local_context_data").label("Has local config context data")]
    }

    fn fieldsets(&self) -> Vec<Fieldset> {
        vec![Fieldset::named("Miscellaneous", &["local_context_data"])]
    }
}

/// Looks up a built-in capability by name.
pub fn capability_by_name(name: &str) -> Option<Box<dyn FilterCapability>> {
    match name {
        "quick_search" => Some(Box::new(QuickSearch)),
        "tagging" => Some(Box::new(Tagging)),
        "tenancy" => Some(Box::new(Tenancy)),
        "contacts" => Some(Box::new(Contacts)),
        "local_config_context" => Some(Box::new(LocalConfigContext)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;

    #[test]
    fn test_capability_lookup() {
        for name in ["quick_search", "tagging", "tenancy", "contacts", "local_config_context"] {
            let cap = capability_by_name(name).unwrap();
            assert_eq!(cap.name(), name);
        }
        assert!(capability_by_name("journaling").is_none());
    }

    #[test]
    fn test_fieldsets_only_name_own_fields() {
        let caps: Vec<Box<dyn FilterCapability>> = vec![
            Box::new(QuickSearch),
            Box::new(Tagging),
            Box::new(Tenancy),
            Box::new(Contacts),
            Box::new(LocalConfigContext),
        ];
        for cap in caps {
            let names: Vec<String> = cap.fields().into_iter().map(|f| f.name).collect();
            for fieldset in cap.fieldsets() {
                for member in &fieldset.fields {
                    assert!(names.contains(member), "{} lists {}", cap.name(), member);
                }
            }
        }
    }

    #[test]
    fn test_tenant_depends_on_group() {
        let fields = Tenancy.fields();
        assert_eq!(fields[1].parents(), vec![("tenant_group_id", "group_id")]);
        assert_eq!(fields[1].kind, FieldKind::MultiReference);
    }
}
