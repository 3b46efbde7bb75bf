//! Tags, customisation, journaling, and change records.

use rackline_persistence::types::SortKey;

use crate::catalog::choices::*;
use crate::error::ConfigError;
use crate::field::{FieldDeclaration, choices};
use crate::form::{FilterForm, FormBuilder, QuickSearch, Tagging};

/// Tags.
pub fn tag_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("tag")
        .with(&QuickSearch)
        .field(
            FieldDeclaration::choice("for_object_type", choices(OBJECT_TYPE))
                .label("Allowed object type")
                .attribute("object_types"),
        )
        .field(FieldDeclaration::exact_text("color").label("Color"))
        .build()
}

/// Custom fields.
pub fn custom_field_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("custom-field")
        .with(&QuickSearch)
        .field(FieldDeclaration::multi_choice("type", choices(CUSTOM_FIELD_TYPE)).label("Field type"))
        .field(
            FieldDeclaration::multi_choice("object_type", choices(OBJECT_TYPE))
                .label("Object type")
                .attribute("object_types"),
        )
        .field(FieldDeclaration::text("group_name").label("Group name"))
        .field(FieldDeclaration::integer("weight").label("Weight"))
        .field(FieldDeclaration::tri_state("required").label("Required"))
        .field(FieldDeclaration::multi_reference("choice_set_id", "custom-field-choice-set").label("Choice set"))
        .field(
            FieldDeclaration::choice("ui_visibility", choices(CUSTOM_FIELD_VISIBILITY))
                .label("UI visibility"),
        )
        .field(FieldDeclaration::tri_state("is_cloneable").label("Is cloneable"))
        .fieldset(
            "Attributes",
            &[
                "type",
                "object_type",
                "group_name",
                "weight",
                "required",
                "choice_set_id",
                "ui_visibility",
                "is_cloneable",
            ],
        )
        .build()
}

/// Custom links.
pub fn custom_link_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("custom-link")
        .with(&QuickSearch)
        .field(
            FieldDeclaration::multi_choice("object_type", choices(OBJECT_TYPE))
                .label("Content types")
                .attribute("object_types"),
        )
        .field(FieldDeclaration::tri_state("enabled").label("Enabled"))
        .field(FieldDeclaration::tri_state("new_window").label("New window"))
        .field(FieldDeclaration::integer("weight").label("Weight"))
        .fieldset("Attributes", &["object_type", "enabled", "new_window", "weight"])
        .build()
}

/// Export templates; data files are narrowed by data source.
pub fn export_template_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("export-template")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_reference("data_source_id", "data-source").label("Data source"))
        .field(
            FieldDeclaration::multi_reference("data_file_id", "data-file")
                .label("Data file")
                .depends_on("source_id", "data_source_id"),
        )
        .field(
            FieldDeclaration::multi_choice("object_type", choices(OBJECT_TYPE))
                .label("Content types")
                .attribute("object_types"),
        )
        .field(FieldDeclaration::text("mime_type").label("MIME type"))
        .field(FieldDeclaration::exact_text("file_extension").label("File extension"))
        .field(FieldDeclaration::tri_state("as_attachment").label("As attachment"))
        .fieldset("Data", &["data_source_id", "data_file_id"])
        .fieldset(
            "Attributes",
            &["object_type", "mime_type", "file_extension", "as_attachment"],
        )
        .build()
}

/// Journal entries, newest first.
pub fn journal_entry_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("journal-entry")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::datetime_before("created_before", "created").label("Before"))
        .field(FieldDeclaration::datetime_after("created_after", "created").label("After"))
        .field(FieldDeclaration::multi_reference("created_by_id", "user").label("User"))
        .field(
            FieldDeclaration::multi_choice("assigned_object_type", choices(OBJECT_TYPE))
                .label("Object type"),
        )
        .field(FieldDeclaration::choice("kind", choices(JOURNAL_ENTRY_KIND)).label("Kind"))
        .fieldset("Creation", &["created_before", "created_after", "created_by_id"])
        .fieldset("Attributes", &["assigned_object_type", "kind"])
        .ordering(vec![SortKey::desc("created"), SortKey::asc("id")])
        .build()
}

/// Change records, newest first.
pub fn object_change_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("object-change")
        .with(&QuickSearch)
        .field(FieldDeclaration::datetime_before("time_before", "time").label("Before"))
        .field(FieldDeclaration::datetime_after("time_after", "time").label("After"))
        .field(FieldDeclaration::choice("action", choices(OBJECT_CHANGE_ACTION)).label("Action"))
        .field(FieldDeclaration::multi_reference("user_id", "user").label("User"))
        .field(
            FieldDeclaration::multi_choice("changed_object_type", choices(OBJECT_TYPE))
                .label("Object type"),
        )
        .fieldset("Time", &["time_before", "time_after"])
        .fieldset("Attributes", &["action", "user_id", "changed_object_type"])
        .ordering(vec![SortKey::desc("time"), SortKey::asc("id")])
        .build()
}

/// Every form in this group.
pub fn forms() -> Result<Vec<FilterForm>, ConfigError> {
    Ok(vec![
        tag_form()?,
        custom_field_form()?,
        custom_link_form()?,
        export_template_form()?,
        journal_entry_form()?,
        object_change_form()?,
    ])
}
