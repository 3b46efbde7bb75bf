//! Tenants and contacts.

use crate::error::ConfigError;
use crate::field::FieldDeclaration;
use crate::form::{Contacts, FilterForm, FormBuilder, QuickSearch, Tagging};

/// Tenant groups.
pub fn tenant_group_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("tenant-group")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_reference("parent_id", "tenant-group").label("Parent group"))
        .build()
}

/// Tenants.
pub fn tenant_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("tenant")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(
            FieldDeclaration::multi_reference("group_id", "tenant-group")
                .label("Group")
                .null_option("None"),
        )
        .with(&Contacts)
        .build()
}

/// Contact groups.
pub fn contact_group_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("contact-group")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_reference("parent_id", "contact-group").label("Parent group"))
        .build()
}

/// Contact roles.
pub fn contact_role_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("contact-role").with(&QuickSearch).with(&Tagging).build()
}

/// Contacts.
pub fn contact_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("contact")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(
            FieldDeclaration::multi_reference("group_id", "contact-group")
                .label("Group")
                .null_option("None"),
        )
        .field(FieldDeclaration::text("email").label("Email"))
        .field(FieldDeclaration::text("phone").label("Phone"))
        .build()
}

/// Every form in this group.
pub fn forms() -> Result<Vec<FilterForm>, ConfigError> {
    Ok(vec![
        tenant_group_form()?,
        tenant_form()?,
        contact_group_form()?,
        contact_role_form()?,
        contact_form()?,
    ])
}
