//! Clusters and virtual machines.

use crate::catalog::choices::*;
use crate::error::ConfigError;
use crate::field::{FieldDeclaration, choices};
use crate::form::{Contacts, FilterForm, FormBuilder, LocalConfigContext, QuickSearch, Tagging, Tenancy};

/// Cluster types.
pub fn cluster_type_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("cluster-type").with(&QuickSearch).with(&Tagging).build()
}

/// Cluster groups.
pub fn cluster_group_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("cluster-group")
        .with(&QuickSearch)
        .with(&Tagging)
        .with(&Contacts)
        .build()
}

/// Clusters.
pub fn cluster_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("cluster")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_reference("type_id", "cluster-type").label("Type"))
        .field(FieldDeclaration::multi_choice("status", choices(CLUSTER_STATUS)).label("Status"))
        .field(
            FieldDeclaration::multi_reference("group_id", "cluster-group")
                .label("Group")
                .null_option("None"),
        )
        .fieldset("Attributes", &["group_id", "type_id", "status"])
        .field(FieldDeclaration::multi_reference("region_id", "region").label("Region"))
        .field(FieldDeclaration::multi_reference("site_group_id", "site-group").label("Site group"))
        .field(
            FieldDeclaration::multi_reference("site_id", "site")
                .label("Site")
                .null_option("None")
                .depends_on("region_id", "region_id")
                .depends_on("group_id", "site_group_id"),
        )
        .fieldset("Location", &["region_id", "site_group_id", "site_id"])
        .with(&Tenancy)
        .with(&Contacts)
        .build()
}

/// Virtual machines; clusters are narrowed by type, group and site.
pub fn virtual_machine_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("virtual-machine")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_reference("cluster_group_id", "cluster-group").label("Cluster group"))
        .field(
            FieldDeclaration::multi_reference("cluster_type_id", "cluster-type")
                .label("Cluster type")
                .null_option("None"),
        )
        .field(FieldDeclaration::multi_reference("region_id", "region").label("Region"))
        .field(FieldDeclaration::multi_reference("site_group_id", "site-group").label("Site group"))
        .field(
            FieldDeclaration::multi_reference("site_id", "site")
                .label("Site")
                .null_option("None")
                .depends_on("region_id", "region_id")
                .depends_on("group_id", "site_group_id"),
        )
        .field(
            FieldDeclaration::multi_reference("cluster_id", "cluster")
                .label("Cluster")
                .depends_on("group_id", "cluster_group_id")
                .depends_on("type_id", "cluster_type_id")
                .depends_on("site_id", "site_id"),
        )
        .fieldset(
            "Cluster",
            &["cluster_group_id", "cluster_type_id", "cluster_id"],
        )
        .fieldset("Location", &["region_id", "site_group_id", "site_id"])
        .field(
            FieldDeclaration::multi_choice("status", choices(VIRTUAL_MACHINE_STATUS))
                .label("Status"),
        )
        .field(FieldDeclaration::multi_reference("role_id", "device-role").label("Role").null_option("None"))
        .field(
            FieldDeclaration::multi_reference("platform_id", "platform")
                .label("Platform")
                .null_option("None"),
        )
        .field(FieldDeclaration::tri_state("has_primary_ip").label("Has a primary IP"))
        .field(FieldDeclaration::text("mac_address").label("MAC address"))
        .fieldset(
            "Attributes",
            &["status", "role_id", "platform_id", "mac_address", "has_primary_ip"],
        )
        .with(&Tenancy)
        .with(&Contacts)
        .with(&LocalConfigContext)
        .build()
}

/// Every form in this group.
pub fn forms() -> Result<Vec<FilterForm>, ConfigError> {
    Ok(vec![
        cluster_type_form()?,
        cluster_group_form()?,
        cluster_form()?,
        virtual_machine_form()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::HasDependencies;

    #[test]
    fn test_cluster_depends_on_three_parents() {
        let form = virtual_machine_form().unwrap();
        assert_eq!(
            form.parents_of("cluster_id"),
            vec!["cluster_group_id", "cluster_type_id", "site_id"]
        );
        let order = form.dependencies().order();
        let site = order.iter().position(|f| f == "site_id").unwrap();
        let cluster = order.iter().position(|f| f == "cluster_id").unwrap();
        assert!(site < cluster);
    }
}
