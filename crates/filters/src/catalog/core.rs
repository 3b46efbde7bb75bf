//! Data sources, data files, and background jobs.

use rackline_persistence::types::SortKey;

use crate::catalog::choices::*;
use crate::error::ConfigError;
use crate::field::{FieldDeclaration, choices};
use crate::form::{FilterForm, FormBuilder, QuickSearch, Tagging};

/// `<name>__after` and `<name>__before` bounds on one timestamp.
const JOB_TIMESTAMPS: &[(&str, &str)] = &[
    ("created", "Created"),
    ("scheduled", "Scheduled"),
    ("started", "Started"),
    ("completed", "Completed"),
];

/// Data sources.
pub fn data_source_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("data-source")
        .with(&QuickSearch)
        .with(&Tagging)
        .field(FieldDeclaration::multi_choice("type", choices(DATA_SOURCE_TYPE)).label("Type"))
        .field(FieldDeclaration::multi_choice("status", choices(DATA_SOURCE_STATUS)).label("Status"))
        .field(FieldDeclaration::tri_state("enabled").label("Enabled"))
        .fieldset("Data Source", &["type", "status", "enabled"])
        .build()
}

/// Data files.
pub fn data_file_form() -> Result<FilterForm, ConfigError> {
    FormBuilder::new("data-file")
        .with(&QuickSearch)
        .field(FieldDeclaration::multi_reference("source_id", "data-source").label("Data source"))
        .fieldset("File", &["source_id"])
        .build()
}

/// Background jobs, newest first.
pub fn job_form() -> Result<FilterForm, ConfigError> {
    let mut builder = FormBuilder::new("job")
        .with(&QuickSearch)
        .field(FieldDeclaration::choice("object_type", choices(OBJECT_TYPE)).label("Object Type"))
        .field(FieldDeclaration::multi_choice("status", choices(JOB_STATUS)).label("Status"))
        .fieldset("Attributes", &["object_type", "status"]);

    let mut creation = Vec::new();
    for (attribute, label) in JOB_TIMESTAMPS {
        let after = format!("{}__after", attribute);
        let before = format!("{}__before", attribute);
        builder = builder
            .field(FieldDeclaration::datetime_after(&after, *attribute).label(format!("{} after", label)))
            .field(FieldDeclaration::datetime_before(&before, *attribute).label(format!("{} before", label)));
        creation.push(after);
        creation.push(before);
    }
    let creation: Vec<&str> = creation.iter().map(String::as_str).collect();

    builder
        .field(FieldDeclaration::multi_reference("user", "user").label("User"))
        .fieldset("Creation", &creation)
        .fieldset("Creation", &["user"])
        .ordering(vec![SortKey::desc("created"), SortKey::asc("id")])
        .build()
}

/// Every form in this group.
pub fn forms() -> Result<Vec<FilterForm>, ConfigError> {
    Ok(vec![data_source_form()?, data_file_form()?, job_form()?])
}
