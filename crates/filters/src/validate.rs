//! Filter form validation.
//!
//! Each parameter is parsed independently against its field declaration.
//! Every error is collected before anything is returned, so callers see the
//! whole set at once.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::data::{FormData, distinct_nonblank, last_nonblank};
use crate::error::FieldErrors;
use crate::field::{FieldDeclaration, FieldKind};
use crate::form::FilterForm;
use crate::lookup::{LookupSuffix, ParamKey, parse_param};

const INVALID_BOOLEAN: &str = "Enter a valid boolean value.";
const INVALID_INTEGER: &str = "Enter a whole number.";
const INVALID_DECIMAL: &str = "Enter a number.";
const INVALID_DATETIME: &str = "Enter a valid date/time.";

/// Value of a reference field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RefValue {
    /// A resource identifier.
    Id(String),
    /// The null option ("has no value").
    Null,
}

/// A parsed, typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    /// Free text.
    Text(String),
    /// One static choice.
    Choice(String),
    /// Several static choices.
    Choices(Vec<String>),
    /// Boolean.
    Boolean(bool),
    /// Whole number.
    Integer(i64),
    /// Decimal number.
    Decimal(Decimal),
    /// Point in time.
    DateTime(DateTime<Utc>),
    /// One resource reference.
    Reference(RefValue),
    /// Several resource references.
    References(Vec<RefValue>),
}

/// One validated parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedValue {
    /// Field name.
    pub field: String,
    /// Explicit lookup, if the parameter carried a suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<LookupSuffix>,
    /// Parsed value.
    pub value: TypedValue,
}

/// Validated form values in declaration order.
///
/// Fields without a value are absent. A field's plain value comes before its
/// suffixed variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CleanedData(Vec<CleanedValue>);

impl CleanedData {
    /// Returns the plain value of a field.
    pub fn get(&self, field: &str) -> Option<&TypedValue> {
        self.0
            .iter()
            .find(|v| v.field == field && v.suffix.is_none())
            .map(|v| &v.value)
    }

    /// Iterates over values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CleanedValue> {
        self.0.iter()
    }

    /// Returns the number of constrained parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is constrained.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

type Cleaned = Result<Option<TypedValue>, Vec<String>>;

impl FilterForm {
    /// Validates raw input against the form.
    ///
    /// Unknown parameter names are ignored. An unsupported lookup suffix is
    /// an error keyed by the full parameter name.
    pub fn validate(&self, data: &FormData) -> Result<CleanedData, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut cleaned: Vec<(usize, Option<LookupSuffix>, CleanedValue)> = Vec::new();

        for (key, values) in data.iter() {
            let Some(param) = parse_param(self, key) else {
                continue;
            };
            let field = param.field();
            let (suffix, result) = match param {
                ParamKey::Plain(_) => (None, clean_plain(field, values)),
                ParamKey::Suffixed(_, suffix) => (Some(suffix), clean_suffixed(field, suffix, values)),
                ParamKey::Unsupported(_, suffix) => {
                    errors.add(
                        key.as_str(),
                        format!("Unsupported lookup '{}' for field '{}'.", suffix, field.name),
                    );
                    continue;
                }
            };

            match result {
                Ok(Some(value)) => {
                    let position = self.position(&field.name).unwrap_or(usize::MAX);
                    cleaned.push((
                        position,
                        suffix,
                        CleanedValue {
                            field: field.name.clone(),
                            suffix,
                            value,
                        },
                    ));
                }
                Ok(None) => {}
                Err(messages) => {
                    for message in messages {
                        errors.add(key.as_str(), message);
                    }
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        cleaned.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        Ok(CleanedData(cleaned.into_iter().map(|(_, _, v)| v).collect()))
    }
}

fn clean_plain(field: &FieldDeclaration, values: &[String]) -> Cleaned {
    match field.kind {
        FieldKind::Text => Ok(last_nonblank(values).map(|v| TypedValue::Text(v.to_string()))),
        FieldKind::Choice => {
            let Some(value) = last_nonblank(values) else {
                return Ok(None);
            };
            if is_declared_choice(field, value) {
                Ok(Some(TypedValue::Choice(value.to_string())))
            } else {
                Err(vec![invalid_choice(value)])
            }
        }
        FieldKind::MultiChoice => clean_choice_set(field, values),
        FieldKind::TriState => clean_boolean(values),
        FieldKind::Integer => clean_integer(field, values),
        FieldKind::Decimal => clean_decimal(field, values),
        FieldKind::DateTime => clean_datetime(values),
        FieldKind::Reference => Ok(last_nonblank(values).map(|v| TypedValue::Reference(reference(field, v)))),
        FieldKind::MultiReference => Ok(clean_reference_set(field, values)),
    }
}

fn clean_suffixed(field: &FieldDeclaration, suffix: LookupSuffix, values: &[String]) -> Cleaned {
    if suffix == LookupSuffix::Empty {
        return clean_boolean(values);
    }
    if suffix.takes_set(field.kind) {
        return if field.kind.is_static_choice() {
            clean_choice_set(field, values)
        } else {
            Ok(clean_reference_set(field, values))
        };
    }
    clean_plain(field, values)
}

fn is_declared_choice(field: &FieldDeclaration, value: &str) -> bool {
    field
        .static_choices()
        .is_some_and(|choices| choices.iter().any(|c| c.value == value))
}

fn invalid_choice(value: &str) -> String {
    format!(
        "Select a valid choice. {} is not one of the available choices.",
        value
    )
}

fn clean_choice_set(field: &FieldDeclaration, values: &[String]) -> Cleaned {
    let values = distinct_nonblank(values);
    let errors: Vec<String> = values
        .iter()
        .filter(|v| !is_declared_choice(field, v))
        .map(|v| invalid_choice(v))
        .collect();
    if !errors.is_empty() {
        return Err(errors);
    }
    if values.is_empty() {
        return Ok(None);
    }
    Ok(Some(TypedValue::Choices(
        values.into_iter().map(str::to_string).collect(),
    )))
}

fn reference(field: &FieldDeclaration, value: &str) -> RefValue {
    if field.is_null_token(value) {
        RefValue::Null
    } else {
        RefValue::Id(value.to_string())
    }
}

fn clean_reference_set(field: &FieldDeclaration, values: &[String]) -> Option<TypedValue> {
    let refs: Vec<RefValue> = distinct_nonblank(values)
        .into_iter()
        .map(|v| reference(field, v))
        .collect();
    if refs.is_empty() {
        None
    } else {
        Some(TypedValue::References(refs))
    }
}

/// Parses a tri-state boolean. `None` means unconstrained.
pub fn parse_tri_state(value: &str) -> Result<Option<bool>, &'static str> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "null" | "unknown" | "none" => Ok(None),
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(INVALID_BOOLEAN),
    }
}

fn clean_boolean(values: &[String]) -> Cleaned {
    let Some(value) = last_nonblank(values) else {
        return Ok(None);
    };
    parse_tri_state(value)
        .map(|parsed| parsed.map(TypedValue::Boolean))
        .map_err(|message| vec![message.to_string()])
}

fn check_min(field: &FieldDeclaration, value: Decimal) -> Result<(), Vec<String>> {
    match field.min_value {
        Some(min) if value < min => Err(vec![format!(
            "Ensure this value is greater than or equal to {}.",
            min
        )]),
        _ => Ok(()),
    }
}

fn clean_integer(field: &FieldDeclaration, values: &[String]) -> Cleaned {
    let Some(value) = last_nonblank(values) else {
        return Ok(None);
    };
    let parsed: i64 = value.parse().map_err(|_| vec![INVALID_INTEGER.to_string()])?;
    check_min(field, Decimal::from(parsed))?;
    Ok(Some(TypedValue::Integer(parsed)))
}

fn clean_decimal(field: &FieldDeclaration, values: &[String]) -> Cleaned {
    let Some(value) = last_nonblank(values) else {
        return Ok(None);
    };
    let parsed = Decimal::from_str(value).map_err(|_| vec![INVALID_DECIMAL.to_string()])?;
    check_min(field, parsed)?;
    Ok(Some(TypedValue::Decimal(parsed)))
}

fn clean_datetime(values: &[String]) -> Cleaned {
    let Some(value) = last_nonblank(values) else {
        return Ok(None);
    };
    parse_datetime(value)
        .map(|dt| Some(TypedValue::DateTime(dt)))
        .ok_or_else(|| vec![INVALID_DATETIME.to_string()])
}

/// Parses a datetime input. Inputs without an offset are taken as UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
