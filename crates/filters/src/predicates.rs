//! Query filter sets: validated values to store predicates.

use rackline_persistence::types::{Lookup, Predicate, PredicateValue};

use crate::field::{Bound, FieldDeclaration, TextMatch};
use crate::form::{FilterForm, HasFields};
use crate::lookup::LookupSuffix;
use crate::validate::{CleanedData, CleanedValue, RefValue, TypedValue};

/// Builds the AND-combined predicate list for validated values.
///
/// One predicate per constrained parameter, in declaration order. Predicates
/// are only built here, never executed.
pub fn build_predicates(form: &FilterForm, cleaned: &CleanedData) -> Vec<Predicate> {
    cleaned
        .iter()
        .filter_map(|value| {
            let field = form.field(&value.field)?;
            Some(match value.suffix {
                None => plain_predicate(field, &value.value),
                Some(suffix) => suffixed_predicate(field, suffix, value),
            })
        })
        .collect()
}

fn plain_predicate(field: &FieldDeclaration, value: &TypedValue) -> Predicate {
    let attribute = field.attribute.as_str();
    match value {
        TypedValue::Text(text) => match field.text_match {
            TextMatch::Contains => Predicate::contains(attribute, text.as_str()),
            TextMatch::Exact => Predicate::exact(attribute, PredicateValue::text(text.as_str())),
            TextMatch::Search => Predicate::search(text.as_str()),
        },
        TypedValue::Reference(RefValue::Null) => {
            Predicate::new(attribute, Lookup::IsNull, PredicateValue::Boolean(true))
        }
        TypedValue::Choices(_) | TypedValue::References(_) => {
            Predicate::new(attribute, Lookup::In, to_predicate_value(value))
        }
        TypedValue::Integer(_) | TypedValue::Decimal(_) | TypedValue::DateTime(_) => {
            let lookup = match field.bound {
                Some(Bound::Lower) => Lookup::Gte,
                Some(Bound::Upper) => Lookup::Lte,
                None => Lookup::Exact,
            };
            Predicate::new(attribute, lookup, to_predicate_value(value))
        }
        TypedValue::Choice(_) | TypedValue::Boolean(_) | TypedValue::Reference(_) => {
            Predicate::exact(attribute, to_predicate_value(value))
        }
    }
}

fn suffixed_predicate(field: &FieldDeclaration, suffix: LookupSuffix, cleaned: &CleanedValue) -> Predicate {
    let (lookup, negated) = suffix.lookup_for(field.kind);
    let predicate = Predicate::new(field.attribute.as_str(), lookup, to_predicate_value(&cleaned.value));
    if negated { predicate.negate() } else { predicate }
}

fn ref_value(value: &RefValue) -> PredicateValue {
    match value {
        RefValue::Id(id) => PredicateValue::text(id.as_str()),
        RefValue::Null => PredicateValue::Null,
    }
}

fn to_predicate_value(value: &TypedValue) -> PredicateValue {
    match value {
        TypedValue::Text(s) | TypedValue::Choice(s) => PredicateValue::text(s.as_str()),
        TypedValue::Choices(values) => PredicateValue::text_set(values.iter().map(String::as_str)),
        TypedValue::Boolean(b) => PredicateValue::Boolean(*b),
        TypedValue::Integer(i) => PredicateValue::Integer(*i),
        TypedValue::Decimal(d) => PredicateValue::Decimal(*d),
        TypedValue::DateTime(dt) => PredicateValue::DateTime(*dt),
        TypedValue::Reference(r) => ref_value(r),
        TypedValue::References(refs) => PredicateValue::Set(refs.iter().map(ref_value).collect()),
    }
}
