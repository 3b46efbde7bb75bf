//! Predicate evaluation against in-memory records.
//!
//! Array-valued attributes match when any element matches. Object values
//! behave like arrays of their values. Null members of a membership set match
//! attributes that are missing or null.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

use crate::types::{Lookup, Predicate, PredicateValue, ResourceRecord, SortKey};

/// Returns true if the record satisfies the predicate.
pub(crate) fn matches(record: &ResourceRecord, predicate: &Predicate) -> bool {
    let value = record.field_value(&predicate.field);
    let hit = match (&predicate.lookup, &predicate.value) {
        (Lookup::Search, PredicateValue::Text(text)) => search(record, text),
        (Lookup::IsNull, PredicateValue::Boolean(expected)) => is_null(&value) == *expected,
        (Lookup::Empty, PredicateValue::Boolean(expected)) => is_empty(&value) == *expected,
        (Lookup::Exact, PredicateValue::Null) => is_null(&value),
        (Lookup::In, PredicateValue::Set(members)) => members.iter().any(|member| match member {
            PredicateValue::Null => is_null(&value),
            other => any_element(&value, |elem| equals(elem, other)),
        }),
        (Lookup::Exact, expected) => any_element(&value, |elem| equals(elem, expected)),
        (lookup, PredicateValue::Text(text)) if lookup.is_text_pattern() => {
            any_element(&value, |elem| text_pattern(elem, *lookup, text))
        }
        (lookup, expected) if lookup.is_range() => {
            any_element(&value, |elem| range(elem, *lookup, expected))
        }
        _ => false,
    };
    hit != predicate.negated
}

fn is_null(value: &Option<Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn is_empty(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn any_element<F>(value: &Option<Value>, mut f: F) -> bool
where
    F: FnMut(&Value) -> bool,
{
    match value {
        None => false,
        Some(Value::Array(items)) => items.iter().any(&mut f),
        Some(Value::Object(map)) => map.values().any(&mut f),
        Some(v) => f(v),
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses a stored timestamp. Naive values are taken as UTC.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn equals(elem: &Value, expected: &PredicateValue) -> bool {
    match expected {
        PredicateValue::Text(s) => as_text(elem).as_deref() == Some(s.as_str()),
        PredicateValue::Integer(i) => elem.as_f64() == Some(*i as f64),
        PredicateValue::Decimal(d) => elem.is_number() && elem.as_f64() == d.to_f64(),
        PredicateValue::Boolean(b) => elem.as_bool() == Some(*b),
        PredicateValue::DateTime(dt) => elem
            .as_str()
            .and_then(parse_timestamp)
            .is_some_and(|stored| stored == *dt),
        PredicateValue::Null | PredicateValue::Set(_) => false,
    }
}

fn text_pattern(elem: &Value, lookup: Lookup, pattern: &str) -> bool {
    let Some(text) = as_text(elem) else {
        return false;
    };
    let text = text.to_lowercase();
    let pattern = pattern.to_lowercase();
    match lookup {
        Lookup::IExact => text == pattern,
        Lookup::IContains => text.contains(&pattern),
        Lookup::IStartsWith => text.starts_with(&pattern),
        Lookup::IEndsWith => text.ends_with(&pattern),
        _ => false,
    }
}

fn range(elem: &Value, lookup: Lookup, bound: &PredicateValue) -> bool {
    let ordering = match bound {
        PredicateValue::Text(s) => elem.as_str().map(|stored| stored.cmp(s.as_str())),
        PredicateValue::Integer(i) => elem.as_f64().and_then(|n| n.partial_cmp(&(*i as f64))),
        PredicateValue::Decimal(d) => d
            .to_f64()
            .and_then(|bound| elem.as_f64().and_then(|n| n.partial_cmp(&bound))),
        PredicateValue::DateTime(dt) => elem
            .as_str()
            .and_then(parse_timestamp)
            .map(|stored| stored.cmp(dt)),
        _ => None,
    };

    match (ordering, lookup) {
        (Some(o), Lookup::Gt) => o == Ordering::Greater,
        (Some(o), Lookup::Gte) => o != Ordering::Less,
        (Some(o), Lookup::Lt) => o == Ordering::Less,
        (Some(o), Lookup::Lte) => o != Ordering::Greater,
        _ => false,
    }
}

fn search(record: &ResourceRecord, text: &str) -> bool {
    let needle = text.to_lowercase();
    record.label.to_lowercase().contains(&needle)
        || record.id.to_lowercase().contains(&needle)
        || record
            .attributes
            .values()
            .any(|value| contains_text(value, &needle))
}

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|v| contains_text(v, needle)),
        Value::Object(map) => map.values().any(|v| contains_text(v, needle)),
        _ => false,
    }
}

/// Sort key for one attribute value: nulls, then numbers, then text.
#[derive(Debug, PartialEq)]
enum SortValue {
    Null,
    Number(f64),
    Text(String),
}

impl SortValue {
    fn from_value(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => SortValue::Null,
            Some(Value::Bool(b)) => SortValue::Number(if b { 1.0 } else { 0.0 }),
            Some(Value::Number(n)) => SortValue::Number(n.as_f64().unwrap_or_default()),
            Some(Value::String(s)) => SortValue::Text(s),
            Some(other) => SortValue::Text(other.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Null => 0,
            SortValue::Number(_) => 1,
            SortValue::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Compares two records by the ordering keys, breaking ties by id.
pub(crate) fn compare_records(a: &ResourceRecord, b: &ResourceRecord, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let left = SortValue::from_value(a.field_value(&key.field));
        let right = SortValue::from_value(b.field_value(&key.field));
        let ordering = left.compare(&right);
        let ordering = if key.descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.id.cmp(&b.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device() -> ResourceRecord {
        ResourceRecord::new("device", "dev-1", "core-sw-01")
            .with_attribute("serial", "XX-AB12-YY")
            .with_attribute("tags", json!(["alpha", "bravo"]))
            .with_attribute("u_height", 2)
            .with_attribute("has_primary_ip", false)
            .with_attribute("created", "2024-03-01T12:00:00Z")
            .with_attribute("location_id", Value::Null)
    }

    #[test]
    fn test_icontains_case_insensitive() {
        assert!(matches(&device(), &Predicate::contains("serial", "ab12")));
        assert!(!matches(&device(), &Predicate::contains("serial", "zz")));
    }

    #[test]
    fn test_array_membership_any_element() {
        let p = Predicate::one_of("tags", vec![PredicateValue::text("bravo")]);
        assert!(matches(&device(), &p));
        let p = Predicate::one_of("tags", vec![PredicateValue::text("charlie")]);
        assert!(!matches(&device(), &p));
    }

    #[test]
    fn test_null_member_matches_missing_and_null() {
        let p = Predicate::one_of(
            "location_id",
            vec![PredicateValue::Null, PredicateValue::text("loc-1")],
        );
        assert!(matches(&device(), &p));
        let p = Predicate::one_of("rack_id", vec![PredicateValue::Null]);
        assert!(matches(&device(), &p));
    }

    #[test]
    fn test_boolean_exact() {
        let p = Predicate::exact("has_primary_ip", PredicateValue::Boolean(false));
        assert!(matches(&device(), &p));
        let p = Predicate::exact("has_primary_ip", PredicateValue::Boolean(true));
        assert!(!matches(&device(), &p));
    }

    #[test]
    fn test_datetime_range() {
        let bound = parse_timestamp("2024-03-01").unwrap();
        let p = Predicate::new("created", Lookup::Gte, PredicateValue::DateTime(bound));
        assert!(matches(&device(), &p));
        let p = Predicate::new("created", Lookup::Lte, PredicateValue::DateTime(bound));
        assert!(!matches(&device(), &p));
    }

    #[test]
    fn test_negated_exact_keeps_missing() {
        let p = Predicate::exact("platform_id", PredicateValue::text("p1")).negate();
        assert!(matches(&device(), &p));
    }

    #[test]
    fn test_search_covers_label_and_nested_text() {
        assert!(matches(&device(), &Predicate::search("CORE")));
        assert!(matches(&device(), &Predicate::search("brav")));
        assert!(!matches(&device(), &Predicate::search("nothing")));
    }

    #[test]
    fn test_empty_lookup() {
        let p = Predicate::new("location_id", Lookup::Empty, PredicateValue::Boolean(true));
        assert!(matches(&device(), &p));
        let p = Predicate::new("tags", Lookup::Empty, PredicateValue::Boolean(false));
        assert!(matches(&device(), &p));
    }

    #[test]
    fn test_parse_timestamp_forms() {
        assert!(parse_timestamp("2024-03-01T12:00:00+02:00").is_some());
        assert!(parse_timestamp("2024-03-01 12:00:00").is_some());
        assert!(parse_timestamp("2024-03-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_compare_records_nulls_first() {
        let a = ResourceRecord::new("rack", "a", "A");
        let b = ResourceRecord::new("rack", "b", "B").with_attribute("u_height", 42);
        let keys = vec![SortKey::asc("u_height")];
        assert_eq!(compare_records(&a, &b, &keys), Ordering::Less);
        let keys = vec![SortKey::desc("u_height")];
        assert_eq!(compare_records(&a, &b, &keys), Ordering::Greater);
    }
}
