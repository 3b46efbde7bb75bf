//! Sites, racks, and devices.

use rust_decimal::Decimal;

use crate::catalog::choices::*;
use crate::error::ConfigError;
use crate::field::{FieldDeclaration, choices};
use crate::form::{Contacts, FilterForm, FormBuilder, LocalConfigContext, QuickSearch, Tagging, Tenancy};

const COMPONENTS: &[(&str, &str)] = &[
    ("console_ports", "Console ports"),
    ("console_server_ports", "Console server ports"),
    ("power_ports", "Power ports"),
    ("power_outlets", "Power outlets"),
    ("interfaces", "Interfaces"),
    ("pass_through_ports", "Pass-through ports"),
];

fn region() -> FieldDeclaration {
    FieldDeclaration::multi_reference("region_id", "region").label("Region")
}

fn site_group() -> FieldDeclaration {
    FieldDeclaration::multi_reference("site_group_id", "site-group").label("Site group")
}

/// Sites narrowed by region and site group.
fn site() -> FieldDeclaration {
    FieldDeclaration::multi_reference("site_id", "site")
        .label("Site")
        .depends_on("region_id", "region_id")
        .depends_on("group_id", "site_group_id")
}

fn location() -> FieldDeclaration {
    FieldDeclaration::multi_reference("location_id", "location")
        .label("Location")
        .null_option("None")
        .depends_on("site_id", "site_id")
}

/// Adds region, site group, site and location with the standard cascade.
fn with_location(builder: FormBuilder) -> FormBuilder {
    builder
        .field(region())
        .field(site_group())
        .field(site())
        .field(location())
        .fieldset("Location", &["region_id", "site_group_id", "site_id", "location_id"])
}

fn with_components(mut builder: FormBuilder) -> FormBuilder {
    let mut names = Vec::with_capacity(COMPONENTS.len());
    for (name, label) in COMPONENTS {
        builder = builder.field(FieldDeclaration::tri_state(*name).label(*label));
        names.push(*name);
    }
    builder.fieldset("Components", &names)
}

fn with_weight(builder: FormBuilder) -> FormBuilder {
    builder
        .field(FieldDeclaration::decimal("weight").label("Weight").min_value(Decimal::ONE))
        .field(FieldDeclaration::choice("weight_unit", choices(WEIGHT_UNIT)).label("Weight unit"))
}

/// Regions.
pub fn region_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("region")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_reference("parent_id", "region").label("Parent region"))
        .fieldset("Attributes", &["parent_id"])
        .with(&Contacts)
        .build()
}

/// Site groups.
pub fn site_group_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("site-group")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_reference("parent_id", "site-group").label("Parent group"))
        .fieldset("Attributes", &["parent_id"])
        .with(&Contacts)
        .build()
}

/// Sites.
pub fn site_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("site")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_choice("status", choices(SITE_STATUS)).label("Status"))
        .field(region())
        .field(FieldDeclaration::multi_reference("group_id", "site-group").label("Site group"))
        .field(FieldDeclaration::multi_reference("asn_id", "asn").label("ASNs").attribute("asns"))
        .fieldset("Attributes", &["status", "region_id", "group_id", "asn_id"])
        .with(&Tenancy)
        .with(&Contacts)
        .build()
}

/// Locations; parents are narrowed by site.
pub fn location_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("location")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(region())
        .field(site_group())
        .field(site())
        .field(
            FieldDeclaration::multi_reference("parent_id", "location")
                .label("Parent")
                .depends_on("region_id", "region_id")
                .depends_on("site_id", "site_id"),
        )
        .field(FieldDeclaration::multi_choice("status", choices(LOCATION_STATUS)).label("Status"))
        .fieldset("Attributes", &["region_id", "site_group_id", "site_id", "parent_id", "status"])
        .with(&Tenancy)
        .with(&Contacts)
        .build()
}

/// Rack roles.
pub fn rack_role_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("rack-role").with(&QuickSearch).with(&Tagging).build()
}

/// Racks.
pub fn rack_form() -> Result<FilterForm, ConfigError> {
    let builder = FormBuilder::new("rack").with(&QuickSearch).with(&Tagging);
    with_weight(with_location(builder))
        .field(FieldDeclaration::multi_choice("status", choices(RACK_STATUS)).label("Status"))
        .field(
            FieldDeclaration::multi_reference("role_id", "rack-role")
                .label("Role")
                .null_option("None"),
        )
        .field(FieldDeclaration::multi_choice("type", choices(RACK_TYPE)).label("Type"))
        .field(FieldDeclaration::multi_choice("width", choices(RACK_WIDTH)).label("Width"))
        .field(FieldDeclaration::text("serial").label("Serial"))
        .field(FieldDeclaration::exact_text("asset_tag").label("Asset tag"))
        .field(FieldDeclaration::integer("max_weight").label("Max weight").min_value(Decimal::ONE))
        .fieldset("Function", &["status", "role_id"])
        .fieldset("Hardware", &["type", "width", "serial", "asset_tag"])
        .with(&Tenancy)
        .with(&Contacts)
        .fieldset("Weight", &["weight", "max_weight", "weight_unit"])
        .build()
}

/// Rack reservations; racks are narrowed by site and location.
pub fn rack_reservation_form() -> Result<FilterForm, ConfigError> {
    let builder = FormBuilder::new("rack-reservation").with(&QuickSearch).with(&Tagging);
    with_location(builder)
        .field(
            FieldDeclaration::multi_reference("rack_id", "rack")
                .label("Rack")
                .depends_on("site_id", "site_id")
                .depends_on("location_id", "location_id"),
        )
        .fieldset("Location", &["rack_id"])
        .field(FieldDeclaration::multi_reference("user_id", "user").label("User"))
        .fieldset("User", &["user_id"])
        .with(&Tenancy)
        .build()
}

/// Manufacturers.
pub fn manufacturer_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("manufacturer")
        .with(&QuickSearch)
        .with(&Tagging)
        .with(&Contacts)
        .build()
}

/// Device types.
pub fn device_type_form() -> Result<FilterForm, ConfigError> {
    let builder = FormBuilder::new("device-type")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_reference("manufacturer_id", "manufacturer").label("Manufacturer"))
        .field(
            FieldDeclaration::multi_reference("default_platform_id", "platform")
                .label("Default platform")
                .depends_on("manufacturer_id", "manufacturer_id"),
        )
        .field(FieldDeclaration::text("part_number").label("Part number"))
        .field(FieldDeclaration::choice("subdevice_role", choices(SUBDEVICE_ROLE)).label("Subdevice role"))
        .field(FieldDeclaration::choice("airflow", choices(DEVICE_AIRFLOW)).label("Airflow"))
        .fieldset(
            "Hardware",
            &["manufacturer_id", "default_platform_id", "part_number", "subdevice_role", "airflow"],
        )
        .field(FieldDeclaration::tri_state("has_front_image").label("Has a front image"))
        .field(FieldDeclaration::tri_state("has_rear_image").label("Has a rear image"))
        .fieldset("Images", &["has_front_image", "has_rear_image"]);
    with_weight(with_components(builder))
        .fieldset("Weight", &["weight", "weight_unit"])
        .build()
}

/// Device roles.
pub fn device_role_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("device-role")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_reference("config_template_id", "config-template").label("Config template"))
        .fieldset("Attributes", &["config_template_id"])
        .build()
}

/// Platforms.
pub fn platform_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("platform")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_reference("manufacturer_id", "manufacturer").label("Manufacturer"))
        .field(FieldDeclaration::multi_reference("config_template_id", "config-template").label("Config template"))
        .fieldset("Attributes", &["manufacturer_id", "config_template_id"])
        .build()
}

/// Devices.
pub fn device_form() -> Result<FilterForm, ConfigError> {
    let builder = FormBuilder::new("device").with(&QuickSearch).with(&Tagging);
    let builder = with_location(builder)
        .field(
            FieldDeclaration::multi_reference("rack_id", "rack")
                .label("Rack")
                .null_option("None")
                .depends_on("site_id", "site_id")
                .depends_on("location_id", "location_id"),
        )
        .fieldset("Location", &["rack_id"])
        .field(FieldDeclaration::multi_choice("status", choices(DEVICE_STATUS)).label("Status"))
        .field(FieldDeclaration::multi_reference("role_id", "device-role").label("Role"))
        .field(
            FieldDeclaration::multi_reference("platform_id", "platform")
                .label("Platform")
                .null_option("None"),
        )
        .field(FieldDeclaration::multi_reference("config_template_id", "config-template").label("Config template"))
        .fieldset("Operation", &["status", "role_id", "platform_id", "config_template_id"])
        .field(FieldDeclaration::multi_reference("manufacturer_id", "manufacturer").label("Manufacturer"))
        .field(
            FieldDeclaration::multi_reference("device_type_id", "device-type")
                .label("Model")
                .depends_on("manufacturer_id", "manufacturer_id"),
        )
        .field(FieldDeclaration::choice("airflow", choices(DEVICE_AIRFLOW)).label("Airflow"))
        .field(FieldDeclaration::text("serial").label("Serial"))
        .field(FieldDeclaration::exact_text("asset_tag").label("Asset tag"))
        .field(FieldDeclaration::text("mac_address").label("MAC address"))
        .fieldset(
            "Hardware",
            &["manufacturer_id", "device_type_id", "airflow", "serial", "asset_tag", "mac_address"],
        )
        .with(&Tenancy)
        .with(&Contacts);
    with_components(builder)
        .field(FieldDeclaration::tri_state("has_primary_ip").label("Has a primary IP"))
        .field(FieldDeclaration::tri_state("has_oob_ip").label("Has an OOB IP"))
        .field(
            FieldDeclaration::tri_state("virtual_chassis_member")
                .label("Virtual chassis member"),
        )
        .fieldset(
            "Miscellaneous",
            &["has_primary_ip", "has_oob_ip", "virtual_chassis_member"],
        )
        .with(&LocalConfigContext)
        .build()
}

/// Modules; module types are narrowed by manufacturer.
pub fn module_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("module")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_reference("manufacturer_id", "manufacturer").label("Manufacturer"))
        .field(
            FieldDeclaration::multi_reference("module_type_id", "module-type")
                .label("Type")
                .depends_on("manufacturer_id", "manufacturer_id"),
        )
        .field(FieldDeclaration::multi_choice("status", choices(MODULE_STATUS)).label("Status"))
        .field(FieldDeclaration::text("serial").label("Serial"))
        .field(FieldDeclaration::exact_text("asset_tag").label("Asset tag"))
        .fieldset(
            "Hardware",
            &["manufacturer_id", "module_type_id", "status", "serial", "asset_tag"],
        )
        .build()
}

/// Virtual chassis.
pub fn virtual_chassis_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("virtual-chassis")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(region())
        .field(site_group())
        .field(site())
        .fieldset("Location", &["region_id", "site_group_id", "site_id"])
        .with(&Tenancy)
        .build()
}

/// Every form in this group.
pub fn forms() -> Result<Vec<FilterForm>, ConfigError> {
    Ok(vec![
        region_form()?,
        site_group_form()?,
        site_form()?,
        location_form()?,
        rack_role_form()?,
        rack_form()?,
        rack_reservation_form()?,
        manufacturer_form()?,
        device_type_form()?,
        device_role_form()?,
        platform_form()?,
        device_form()?,
        module_form()?,
        virtual_chassis_form()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{HasDependencies, HasFields};

    #[test]
    fn test_rack_cascade() {
        let form = rack_form().unwrap();
        assert_eq!(form.parents_of("site_id"), vec!["region_id", "site_group_id"]);
        assert_eq!(form.parents_of("location_id"), vec!["site_id"]);
        assert!(form.field("location_id").unwrap().null_option.is_some());

        let location = form.fieldsets().iter().find(|f| f.name.as_deref() == Some("Location")).unwrap();
        assert_eq!(location.fields, ["region_id", "site_group_id", "site_id", "location_id"]);
    }

    #[test]
    fn test_device_rack_depends_on_site_and_location() {
        let form = device_form().unwrap();
        assert_eq!(form.parents_of("rack_id"), vec!["site_id", "location_id"]);
        assert_eq!(form.parents_of("device_type_id"), vec!["manufacturer_id"]);
        assert_eq!(form.field("device_type_id").unwrap().label, "Model");
        assert_eq!(
            form.capabilities(),
            ["quick_search", "tagging", "tenancy", "contacts", "local_config_context"]
        );
    }

    #[test]
    fn test_site_uses_group_id() {
        let form = site_form().unwrap();
        assert!(form.field("group_id").is_some());
        assert!(form.field("site_group_id").is_none());
        assert_eq!(form.field("asn_id").unwrap().attribute, "asns");
    }

    #[test]
    fn test_weight_minimum() {
        let form = rack_form().unwrap();
        assert_eq!(form.field("weight").unwrap().min_value, Some(Decimal::ONE));
        assert_eq!(form.field("max_weight").unwrap().min_value, Some(Decimal::ONE));
    }

    #[test]
    fn test_all_forms_build() {
        assert_eq!(forms().unwrap().len(), 14);
    }
}
