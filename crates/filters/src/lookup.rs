//! Lookup expressions: `<field>__<suffix>` parameters.
//!
//! | Kind | Suffixes |
//! |------|----------|
//! | text | `n`, `ic`, `nic`, `isw`, `nisw`, `iew`, `niew`, `ie`, `nie`, `empty` |
//! | integer, decimal, datetime | `n`, `lt`, `lte`, `gt`, `gte`, `empty` |
//! | choice, reference | `n`, `empty` |
//!
//! A leading `n` negates the lookup; `empty` takes a boolean.

use std::fmt;
use std::str::FromStr;

use rackline_persistence::types::Lookup;
use serde::{Deserialize, Serialize};

use crate::field::{FieldDeclaration, FieldKind, TextMatch};
use crate::form::{FilterForm, HasFields};

/// Separator between field name and lookup suffix.
pub const LOOKUP_SEPARATOR: &str = "__";

/// An explicit lookup selected by a parameter suffix.
///
/// Variants are named after their suffix text.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupSuffix {
    N,
    Ic,
    Nic,
    Isw,
    Nisw,
    Iew,
    Niew,
    Ie,
    Nie,
    Empty,
    Lt,
    Lte,
    Gt,
    Gte,
}

const TEXT_SUFFIXES: &[LookupSuffix] = &[
    LookupSuffix::N,
    LookupSuffix::Ic,
    LookupSuffix::Nic,
    LookupSuffix::Isw,
    LookupSuffix::Nisw,
    LookupSuffix::Iew,
    LookupSuffix::Niew,
    LookupSuffix::Ie,
    LookupSuffix::Nie,
    LookupSuffix::Empty,
];

const ORDERED_SUFFIXES: &[LookupSuffix] = &[
    LookupSuffix::N,
    LookupSuffix::Lt,
    LookupSuffix::Lte,
    LookupSuffix::Gt,
    LookupSuffix::Gte,
    LookupSuffix::Empty,
];

const MEMBERSHIP_SUFFIXES: &[LookupSuffix] = &[LookupSuffix::N, LookupSuffix::Empty];

impl LookupSuffix {
    /// Returns the suffix text.
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupSuffix::N => "n",
            LookupSuffix::Ic => "ic",
            LookupSuffix::Nic => "nic",
            LookupSuffix::Isw => "isw",
            LookupSuffix::Nisw => "nisw",
            LookupSuffix::Iew => "iew",
            LookupSuffix::Niew => "niew",
            LookupSuffix::Ie => "ie",
            LookupSuffix::Nie => "nie",
            LookupSuffix::Empty => "empty",
            LookupSuffix::Lt => "lt",
            LookupSuffix::Lte => "lte",
            LookupSuffix::Gt => "gt",
            LookupSuffix::Gte => "gte",
        }
    }

    /// Returns the suffixes a field supports.
    ///
    /// Quick-search and tri-state fields support none; range-bound fields
    /// already carry their operator.
    pub fn supported_by(field: &FieldDeclaration) -> &'static [LookupSuffix] {
        if field.bound.is_some() {
            return &[];
        }
        match field.kind {
            FieldKind::Text if field.text_match == TextMatch::Search => &[],
            FieldKind::Text => TEXT_SUFFIXES,
            FieldKind::Integer | FieldKind::Decimal | FieldKind::DateTime => ORDERED_SUFFIXES,
            FieldKind::Choice
            | FieldKind::MultiChoice
            | FieldKind::Reference
            | FieldKind::MultiReference => MEMBERSHIP_SUFFIXES,
            FieldKind::TriState => &[],
        }
    }

    /// Returns the predicate operator and negation for a field kind.
    pub fn lookup_for(&self, kind: FieldKind) -> (Lookup, bool) {
        match self {
            LookupSuffix::N if kind.is_static_choice() || kind.is_reference() => (Lookup::In, true),
            LookupSuffix::N => (Lookup::Exact, true),
            LookupSuffix::Ic => (Lookup::IContains, false),
            LookupSuffix::Nic => (Lookup::IContains, true),
            LookupSuffix::Isw => (Lookup::IStartsWith, false),
            LookupSuffix::Nisw => (Lookup::IStartsWith, true),
            LookupSuffix::Iew => (Lookup::IEndsWith, false),
            LookupSuffix::Niew => (Lookup::IEndsWith, true),
            LookupSuffix::Ie => (Lookup::IExact, false),
            LookupSuffix::Nie => (Lookup::IExact, true),
            LookupSuffix::Empty => (Lookup::Empty, false),
            LookupSuffix::Lt => (Lookup::Lt, false),
            LookupSuffix::Lte => (Lookup::Lte, false),
            LookupSuffix::Gt => (Lookup::Gt, false),
            LookupSuffix::Gte => (Lookup::Gte, false),
        }
    }

    /// Returns true if the suffix takes a set of values on this kind.
    pub fn takes_set(&self, kind: FieldKind) -> bool {
        *self == LookupSuffix::N && (kind.is_static_choice() || kind.is_reference())
    }
}

impl fmt::Display for LookupSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupSuffix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" => Ok(LookupSuffix::N),
            "ic" => Ok(LookupSuffix::Ic),
            "nic" => Ok(LookupSuffix::Nic),
            "isw" => Ok(LookupSuffix::Isw),
            "nisw" => Ok(LookupSuffix::Nisw),
            "iew" => Ok(LookupSuffix::Iew),
            "niew" => Ok(LookupSuffix::Niew),
            "ie" => Ok(LookupSuffix::Ie),
            "nie" => Ok(LookupSuffix::Nie),
            "empty" => Ok(LookupSuffix::Empty),
            "lt" => Ok(LookupSuffix::Lt),
            "lte" => Ok(LookupSuffix::Lte),
            "gt" => Ok(LookupSuffix::Gt),
            "gte" => Ok(LookupSuffix::Gte),
            _ => Err(format!("Unknown lookup suffix: {}", s)),
        }
    }
}

/// A parameter name resolved against a form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKey<'a> {
    /// The parameter is a field name.
    Plain(&'a FieldDeclaration),
    /// The parameter is `<field>__<suffix>` with a supported suffix.
    Suffixed(&'a FieldDeclaration, LookupSuffix),
    /// The parameter names a field but its suffix is not supported.
    Unsupported(&'a FieldDeclaration, &'a str),
}

impl<'a> ParamKey<'a> {
    /// Returns the field the parameter refers to.
    pub fn field(&self) -> &'a FieldDeclaration {
        match self {
            ParamKey::Plain(f) | ParamKey::Suffixed(f, _) | ParamKey::Unsupported(f, _) => f,
        }
    }
}

/// Resolves a parameter name. Returns `None` for names unrelated to the form.
///
/// Exact field names win over suffix parsing, so `created__after` stays a
/// field of its own.
pub fn parse_param<'a>(form: &'a FilterForm, key: &'a str) -> Option<ParamKey<'a>> {
    if let Some(field) = form.field(key) {
        return Some(ParamKey::Plain(field));
    }
    let (base, suffix) = key.rsplit_once(LOOKUP_SEPARATOR)?;
    let field = form.field(base)?;
    match suffix.parse::<LookupSuffix>() {
        Ok(parsed) if LookupSuffix::supported_by(field).contains(&parsed) => {
            Some(ParamKey::Suffixed(field, parsed))
        }
        _ => Some(ParamKey::Unsupported(field, suffix)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Choice;
    use crate::form::{FormBuilder, QuickSearch};

    fn form() -> FilterForm {
        FormBuilder::new("device")
            .with(&QuickSearch)
            .field(FieldDeclaration::text("serial"))
            .field(FieldDeclaration::integer("position"))
            .field(FieldDeclaration::multi_choice("status", vec![Choice::new("active", "Active")]))
            .field(FieldDeclaration::tri_state("has_primary_ip"))
            .field(FieldDeclaration::datetime_after("created__after", "created"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_plain_and_suffixed() {
        let form = form();
        assert!(matches!(parse_param(&form, "serial"), Some(ParamKey::Plain(_))));
        assert!(matches!(
            parse_param(&form, "serial__nic"),
            Some(ParamKey::Suffixed(_, LookupSuffix::Nic))
        ));
        assert!(matches!(
            parse_param(&form, "position__gte"),
            Some(ParamKey::Suffixed(_, LookupSuffix::Gte))
        ));
        assert!(matches!(
            parse_param(&form, "created__after"),
            Some(ParamKey::Plain(f)) if f.name == "created__after"
        ));
    }

    #[test]
    fn test_unsupported_and_unrelated() {
        let form = form();
        assert!(matches!(
            parse_param(&form, "status__gt"),
            Some(ParamKey::Unsupported(_, "gt"))
        ));
        assert!(matches!(
            parse_param(&form, "has_primary_ip__n"),
            Some(ParamKey::Unsupported(..))
        ));
        assert!(matches!(parse_param(&form, "q__ic"), Some(ParamKey::Unsupported(..))));
        assert!(matches!(
            parse_param(&form, "created__after__lt"),
            Some(ParamKey::Unsupported(..))
        ));
        assert_eq!(parse_param(&form, "offset"), None);
        assert_eq!(parse_param(&form, "asset_tag__ic"), None);
    }

    #[test]
    fn test_lookup_mapping() {
        assert_eq!(LookupSuffix::N.lookup_for(FieldKind::Text), (Lookup::Exact, true));
        assert_eq!(LookupSuffix::N.lookup_for(FieldKind::MultiReference), (Lookup::In, true));
        assert_eq!(LookupSuffix::Nisw.lookup_for(FieldKind::Text), (Lookup::IStartsWith, true));
        assert_eq!(LookupSuffix::Lte.lookup_for(FieldKind::DateTime), (Lookup::Lte, false));
        assert!(LookupSuffix::N.takes_set(FieldKind::Choice));
        assert!(!LookupSuffix::N.takes_set(FieldKind::Integer));
    }
}
