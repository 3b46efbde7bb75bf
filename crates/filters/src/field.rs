//! Filter field declarations.
//!
//! A [`FieldDeclaration`] describes one optional search input: its kind, the
//! store attribute it compares, and where its candidate choices come from.
//! Dependencies on other fields are expressed through the query parameters
//! of a [`ResourceQuery`], e.g. `group_id -> $site_group_id`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw token that selects the null option of a reference field.
pub const NULL_TOKEN: &str = "null";

/// Input kind of a filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// One value from a static choice set.
    Choice,
    /// Any number of values from a static choice set.
    MultiChoice,
    /// Boolean that may be left unconstrained.
    TriState,
    /// Whole number.
    Integer,
    /// Decimal number.
    Decimal,
    /// Point in time.
    DateTime,
    /// One resource identifier.
    Reference,
    /// Any number of resource identifiers.
    MultiReference,
}

impl FieldKind {
    /// Returns the kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Choice => "choice",
            FieldKind::MultiChoice => "multi_choice",
            FieldKind::TriState => "tri_state",
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "decimal",
            FieldKind::DateTime => "datetime",
            FieldKind::Reference => "reference",
            FieldKind::MultiReference => "multi_reference",
        }
    }

    /// Returns true for resource reference kinds.
    pub fn is_reference(&self) -> bool {
        matches!(self, FieldKind::Reference | FieldKind::MultiReference)
    }

    /// Returns true for static choice kinds.
    pub fn is_static_choice(&self) -> bool {
        matches!(self, FieldKind::Choice | FieldKind::MultiChoice)
    }

    /// Returns true if the kind accepts several values at once.
    pub fn is_multi(&self) -> bool {
        matches!(self, FieldKind::MultiChoice | FieldKind::MultiReference)
    }

    /// Returns true for integer, decimal, and datetime kinds.
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            FieldKind::Integer | FieldKind::Decimal | FieldKind::DateTime
        )
    }

    /// Returns true if a field of this kind can restrict a dependent field.
    pub fn can_be_parent(&self) -> bool {
        self.is_reference() || self.is_static_choice()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(FieldKind::Text),
            "choice" => Ok(FieldKind::Choice),
            "multi_choice" => Ok(FieldKind::MultiChoice),
            "tri_state" | "boolean" => Ok(FieldKind::TriState),
            "integer" => Ok(FieldKind::Integer),
            "decimal" => Ok(FieldKind::Decimal),
            "datetime" => Ok(FieldKind::DateTime),
            "reference" => Ok(FieldKind::Reference),
            "multi_reference" => Ok(FieldKind::MultiReference),
            _ => Err(format!("Unknown field kind: {}", s)),
        }
    }
}

/// A candidate value offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Choice {
    /// Submitted value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl Choice {
    /// Creates a choice.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Builds a static choice list from `(value, label)` pairs.
pub fn choices(pairs: &[(&str, &str)]) -> Vec<Choice> {
    pairs
        .iter()
        .map(|(value, label)| Choice::new(*value, *label))
        .collect()
}

/// Value side of a query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    /// `$<field>`: the settled value of another field in the same form.
    Field(String),
    /// A fixed value that always restricts the candidate query.
    Literal(String),
}

impl ParamValue {
    /// Parses a raw parameter value; a leading `$` names a field.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('$') {
            Some(field) => ParamValue::Field(field.to_string()),
            None => ParamValue::Literal(raw.to_string()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Field(name) => write!(f, "${}", name),
            ParamValue::Literal(value) => f.write_str(value),
        }
    }
}

/// Restriction applied to a candidate query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// Attribute of the candidate resource.
    pub attribute: String,
    /// Where the restricting value comes from.
    pub value: ParamValue,
}

/// Dynamic choice source backed by a resource collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuery {
    /// Resource type of the candidates.
    pub resource_type: String,
    /// Attribute used as the choice value (`id` by default).
    pub value_attribute: String,
    /// Restrictions, in declaration order.
    pub query_params: Vec<QueryParam>,
}

impl ResourceQuery {
    /// Creates an unrestricted query over a resource type.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            value_attribute: "id".to_string(),
            query_params: Vec::new(),
        }
    }

    /// Returns the names of the fields this query depends on.
    pub fn parent_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query_params.iter().filter_map(|p| match &p.value {
            ParamValue::Field(parent) => Some((parent.as_str(), p.attribute.as_str())),
            ParamValue::Literal(_) => None,
        })
    }
}

/// Where a field's candidate values come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ChoiceSource {
    /// No candidates (free input).
    #[default]
    None,
    /// A fixed enumeration.
    Static {
        /// The declared choices.
        choices: Vec<Choice>,
    },
    /// Records of another resource type.
    Resource(ResourceQuery),
}

/// How a text field compares its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    /// Case-insensitive substring.
    #[default]
    Contains,
    /// Exact equality.
    Exact,
    /// Free-text search across the record.
    Search,
}

/// One side of a range pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// `attribute >= value`.
    Lower,
    /// `attribute <= value`.
    Upper,
}

/// A single named, optional filter input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    /// Parameter name, unique within a form.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Input kind.
    pub kind: FieldKind,
    /// Filter fields are never required; kept so declarations can be checked.
    #[serde(default)]
    pub required: bool,
    /// Candidate source.
    #[serde(default)]
    pub choices: ChoiceSource,
    /// Store attribute compared by this field's predicate.
    pub attribute: String,
    /// Text comparison mode.
    #[serde(default)]
    pub text_match: TextMatch,
    /// Range side for one-sided bound fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound: Option<Bound>,
    /// Label of the null option; enables the `null` token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_option: Option<String>,
    /// Smallest accepted numeric value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Decimal>,
}

impl FieldDeclaration {
    /// Creates a declaration with defaults derived from the name.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: default_label(&name),
            attribute: name.clone(),
            name,
            kind,
            required: false,
            choices: ChoiceSource::None,
            text_match: TextMatch::Contains,
            bound: None,
            null_option: None,
            min_value: None,
        }
    }

    /// Case-insensitive substring text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Exact-match text field.
    pub fn exact_text(name: impl Into<String>) -> Self {
        let mut field = Self::new(name, FieldKind::Text);
        field.text_match = TextMatch::Exact;
        field
    }

    /// Quick-search text field.
    pub fn search(name: impl Into<String>) -> Self {
        let mut field = Self::new(name, FieldKind::Text);
        field.text_match = TextMatch::Search;
        field.label = "Search".to_string();
        field
    }

    /// Single static choice.
    pub fn choice(name: impl Into<String>, choices: Vec<Choice>) -> Self {
        let mut field = Self::new(name, FieldKind::Choice);
        field.choices = ChoiceSource::Static { choices };
        field
    }

    /// Multiple static choices.
    pub fn multi_choice(name: impl Into<String>, choices: Vec<Choice>) -> Self {
        let mut field = Self::new(name, FieldKind::MultiChoice);
        field.choices = ChoiceSource::Static { choices };
        field
    }

    /// Tri-state boolean.
    pub fn tri_state(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::TriState)
    }

    /// Whole number.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// Decimal number.
    pub fn decimal(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Decimal)
    }

    /// Point in time compared for equality.
    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    /// Lower datetime bound on `attribute`.
    pub fn datetime_after(name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::datetime(name).attribute(attribute).bound(Bound::Lower)
    }

    /// Upper datetime bound on `attribute`.
    pub fn datetime_before(name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::datetime(name).attribute(attribute).bound(Bound::Upper)
    }

    /// One resource identifier.
    pub fn reference(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        let mut field = Self::new(name, FieldKind::Reference);
        field.choices = ChoiceSource::Resource(ResourceQuery::new(resource_type));
        field
    }

    /// Any number of resource identifiers.
    pub fn multi_reference(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        let mut field = Self::new(name, FieldKind::MultiReference);
        field.choices = ChoiceSource::Resource(ResourceQuery::new(resource_type));
        field
    }

    /// Sets the display label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the compared store attribute.
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    /// Marks the field as one side of a range.
    pub fn bound(mut self, bound: Bound) -> Self {
        self.bound = Some(bound);
        self
    }

    /// Enables the null option with the given label.
    pub fn null_option(mut self, label: impl Into<String>) -> Self {
        self.null_option = Some(label.into());
        self
    }

    /// Sets the smallest accepted numeric value.
    pub fn min_value(mut self, min: impl Into<Decimal>) -> Self {
        self.min_value = Some(min.into());
        self
    }

    /// Marks the field required. Forms reject this at build time.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Adds a query parameter to the resource choice source.
    ///
    /// `value` is either `$<field>` (a dependency) or a literal. Has no
    /// effect on fields without a resource source.
    pub fn query_param(mut self, attribute: impl Into<String>, value: &str) -> Self {
        if let ChoiceSource::Resource(query) = &mut self.choices {
            query.query_params.push(QueryParam {
                attribute: attribute.into(),
                value: ParamValue::parse(value),
            });
        }
        self
    }

    /// Declares a dependency: candidates must have `attribute` in the
    /// settled values of `parent`.
    pub fn depends_on(self, attribute: impl Into<String>, parent: &str) -> Self {
        let placeholder = format!("${}", parent.trim_start_matches('$'));
        self.query_param(attribute, &placeholder)
    }

    /// Sets the candidate attribute used as the choice value.
    pub fn value_attribute(mut self, attribute: impl Into<String>) -> Self {
        if let ChoiceSource::Resource(query) = &mut self.choices {
            query.value_attribute = attribute.into();
        }
        self
    }

    /// Returns the resource query, if the field is resource-backed.
    pub fn resource_query(&self) -> Option<&ResourceQuery> {
        match &self.choices {
            ChoiceSource::Resource(query) => Some(query),
            _ => None,
        }
    }

    /// Returns the static choices, if any.
    pub fn static_choices(&self) -> Option<&[Choice]> {
        match &self.choices {
            ChoiceSource::Static { choices } => Some(choices),
            _ => None,
        }
    }

    /// Returns true if `token` selects the null option.
    pub fn is_null_token(&self, token: &str) -> bool {
        self.null_option.is_some() && token == NULL_TOKEN
    }

    /// Returns the `(parent, attribute)` pairs this field depends on.
    pub fn parents(&self) -> Vec<(&str, &str)> {
        self.resource_query()
            .map(|q| q.parent_fields().collect())
            .unwrap_or_default()
    }
}

/// Derives a label such as `Site group` from `site_group_id`.
fn default_label(name: &str) -> String {
    let base = name.strip_suffix("_id").unwrap_or(name);
    let words = base.replace("__", " ").replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_label() {
        assert_eq!(default_label("site_group_id"), "Site group");
        assert_eq!(default_label("created__after"), "Created after");
        assert_eq!(default_label("q"), "Q");
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("multi_reference".parse::<FieldKind>(), Ok(FieldKind::MultiReference));
        assert_eq!("boolean".parse::<FieldKind>(), Ok(FieldKind::TriState));
        assert!("colour".parse::<FieldKind>().is_err());
    }

    #[test]
    fn test_param_value_parse() {
        assert_eq!(ParamValue::parse("$region_id"), ParamValue::Field("region_id".into()));
        assert_eq!(ParamValue::parse("physical"), ParamValue::Literal("physical".into()));
    }

    #[test]
    fn test_depends_on_builds_placeholder() {
        let field = FieldDeclaration::multi_reference("site_id", "site")
            .depends_on("region_id", "$region_id")
            .depends_on("group_id", "site_group_id")
            .query_param("kind", "physical");

        assert_eq!(
            field.parents(),
            vec![("region_id", "region_id"), ("site_group_id", "group_id")]
        );
        let query = field.resource_query().unwrap();
        assert_eq!(query.query_params.len(), 3);
        assert_eq!(query.query_params[2].value, ParamValue::Literal("physical".into()));
    }

    #[test]
    fn test_query_param_ignored_without_resource() {
        let field = FieldDeclaration::text("serial").depends_on("site_id", "site_id");
        assert!(field.parents().is_empty());
    }

    #[test]
    fn test_null_token_requires_null_option() {
        let plain = FieldDeclaration::multi_reference("location_id", "location");
        assert!(!plain.is_null_token("null"));
        let nullable = plain.null_option("None");
        assert!(nullable.is_null_token("null"));
        assert!(!nullable.is_null_token("None"));
    }

    #[test]
    fn test_datetime_bound_helpers() {
        let after = FieldDeclaration::datetime_after("created__after", "created");
        assert_eq!(after.attribute, "created");
        assert_eq!(after.bound, Some(Bound::Lower));
        assert_eq!(after.label, "Created after");
    }
}
