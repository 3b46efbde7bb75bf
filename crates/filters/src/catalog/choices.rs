//! Static choice sets used by the built-in forms, as `(value, label)` pairs.

#![allow(missing_docs)]

pub const SITE_STATUS: &[(&str, &str)] = &[
    ("planned", "Planned"),
    ("staging", "Staging"),
    ("active", "Active"),
    ("decommissioning", "Decommissioning"),
    ("retired", "Retired"),
];

pub const LOCATION_STATUS: &[(&str, &str)] = SITE_STATUS;

pub const RACK_STATUS: &[(&str, &str)] = &[
    ("reserved", "Reserved"),
    ("available", "Available"),
    ("planned", "Planned"),
    ("active", "Active"),
    ("deprecated", "Deprecated"),
];

pub const RACK_TYPE: &[(&str, &str)] = &[
    ("2-post-frame", "2-post frame"),
    ("4-post-frame", "4-post frame"),
    ("4-post-cabinet", "4-post cabinet"),
    ("wall-frame", "Wall-mounted frame"),
    ("wall-frame-vertical", "Wall-mounted frame (vertical)"),
    ("wall-cabinet", "Wall-mounted cabinet"),
    ("wall-cabinet-vertical", "Wall-mounted cabinet (vertical)"),
];

pub const RACK_WIDTH: &[(&str, &str)] = &[
    ("10", "10 inches"),
    ("19", "19 inches"),
    ("21", "21 inches"),
    ("23", "23 inches"),
];

pub const WEIGHT_UNIT: &[(&str, &str)] = &[
    ("kg", "Kilograms"),
    ("g", "Grams"),
    ("lb", "Pounds"),
    ("oz", "Ounces"),
];

pub const DEVICE_STATUS: &[(&str, &str)] = &[
    ("offline", "Offline"),
    ("active", "Active"),
    ("planned", "Planned"),
    ("staged", "Staged"),
    ("failed", "Failed"),
    ("inventory", "Inventory"),
    ("decommissioning", "Decommissioning"),
];

pub const DEVICE_AIRFLOW: &[(&str, &str)] = &[
    ("front-to-rear", "Front to rear"),
    ("rear-to-front", "Rear to front"),
    ("left-to-right", "Left to right"),
    ("right-to-left", "Right to left"),
    ("side-to-rear", "Side to rear"),
    ("passive", "Passive"),
    ("mixed", "Mixed"),
];

pub const SUBDEVICE_ROLE: &[(&str, &str)] = &[("parent", "Parent"), ("child", "Child")];

pub const MODULE_STATUS: &[(&str, &str)] = &[
    ("offline", "Offline"),
    ("active", "Active"),
    ("planned", "Planned"),
    ("staged", "Staged"),
    ("failed", "Failed"),
    ("decommissioning", "Decommissioning"),
];

pub const JOURNAL_ENTRY_KIND: &[(&str, &str)] = &[
    ("info", "Info"),
    ("success", "Success"),
    ("warning", "Warning"),
    ("danger", "Danger"),
];

pub const OBJECT_CHANGE_ACTION: &[(&str, &str)] = &[
    ("create", "Created"),
    ("update", "Updated"),
    ("delete", "Deleted"),
];

pub const CUSTOM_FIELD_TYPE: &[(&str, &str)] = &[
    ("text", "Text"),
    ("longtext", "Text (long)"),
    ("integer", "Integer"),
    ("decimal", "Decimal"),
    ("boolean", "Boolean (true/false)"),
    ("date", "Date"),
    ("datetime", "Date & time"),
    ("url", "URL"),
    ("json", "JSON"),
    ("select", "Selection"),
    ("multiselect", "Multiple selection"),
    ("object", "Object"),
    ("multiobject", "Multiple objects"),
];

pub const CUSTOM_FIELD_VISIBILITY: &[(&str, &str)] = &[
    ("read-write", "Read/write"),
    ("read-only", "Read-only"),
    ("hidden", "Hidden"),
    ("hidden-ifunset", "Hidden (if unset)"),
];

pub const DATA_SOURCE_TYPE: &[(&str, &str)] = &[
    ("local", "Local"),
    ("git", "Git"),
    ("amazon-s3", "Amazon S3"),
];

pub const DATA_SOURCE_STATUS: &[(&str, &str)] = &[
    ("new", "New"),
    ("queued", "Queued"),
    ("syncing", "Syncing"),
    ("completed", "Completed"),
    ("failed", "Failed"),
];

pub const JOB_STATUS: &[(&str, &str)] = &[
    ("pending", "Pending"),
    ("scheduled", "Scheduled"),
    ("running", "Running"),
    ("completed", "Completed"),
    ("errored", "Errored"),
    ("failed", "Failed"),
];

pub const CLUSTER_STATUS: &[(&str, &str)] = &[
    ("planned", "Planned"),
    ("staging", "Staging"),
    ("active", "Active"),
    ("decommissioning", "Decommissioning"),
    ("offline", "Offline"),
];

pub const VIRTUAL_MACHINE_STATUS: &[(&str, &str)] = &[
    ("offline", "Offline"),
    ("active", "Active"),
    ("planned", "Planned"),
    ("staged", "Staged"),
    ("failed", "Failed"),
    ("decommissioning", "Decommissioning"),
];

/// Resource types that other records can point at by type.
pub const OBJECT_TYPE: &[(&str, &str)] = &[
    ("region", "Region"),
    ("site-group", "Site group"),
    ("site", "Site"),
    ("location", "Location"),
    ("rack", "Rack"),
    ("rack-reservation", "Rack reservation"),
    ("manufacturer", "Manufacturer"),
    ("device-type", "Device type"),
    ("device", "Device"),
    ("module", "Module"),
    ("virtual-chassis", "Virtual chassis"),
    ("tenant", "Tenant"),
    ("contact", "Contact"),
    ("cluster", "Cluster"),
    ("virtual-machine", "Virtual machine"),
    ("data-source", "Data source"),
];
