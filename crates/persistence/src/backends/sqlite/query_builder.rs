//! SQL query builder for store queries.
//!
//! Records live in a single `resources` table with their attributes stored
//! as a JSON document. Attribute predicates run over
//! `json_each(attributes, '$.<name>')`, which yields one row for a scalar and
//! one row per element for an array, so array attributes match when any
//! element matches.
//!
//! Case-insensitive lookups compare `casefold(value)` with a pattern that is
//! lowercased before binding. `casefold` is registered on every pooled
//! connection since SQLite's own `LIKE` and `lower` only fold ASCII.

use rust_decimal::prelude::ToPrimitive;

use crate::types::{Lookup, Predicate, PredicateValue, SortKey, StoreQuery};

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone, Default)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
    /// Float parameter.
    Float(f64),
    /// Null parameter.
    Null,
}

impl SqlParam {
    /// Creates a string parameter.
    pub fn string(s: impl Into<String>) -> Self {
        SqlParam::String(s.into())
    }

    /// Converts to a boxed rusqlite value.
    pub fn to_sql(&self) -> Box<dyn rusqlite::ToSql> {
        match self {
            SqlParam::String(s) => Box::new(s.clone()),
            SqlParam::Integer(i) => Box::new(*i),
            SqlParam::Float(f) => Box::new(*f),
            SqlParam::Null => Box::new(Option::<String>::None),
        }
    }
}

impl SqlFragment {
    /// Creates a new SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Adds a parameter placeholder and returns the placeholder string.
    pub fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }
}

/// Escapes special characters for LIKE patterns.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Where a predicate reads its values from.
enum Source<'a> {
    /// A table column (`id` or `label`).
    Column(&'static str),
    /// A JSON attribute.
    Attribute(&'a str),
}

impl<'a> Source<'a> {
    fn of(field: &'a str) -> Self {
        match field {
            "id" => Source::Column("r.id"),
            "label" => Source::Column("r.label"),
            other => Source::Attribute(other),
        }
    }

    fn path(name: &str) -> String {
        format!("'$.{}'", name)
    }

    /// Wraps an element condition so it applies to every element.
    fn any_element(&self, condition: impl Fn(&str, &str) -> String) -> String {
        match self {
            Source::Column(col) => condition(col, "'text'"),
            Source::Attribute(name) => format!(
                "EXISTS (SELECT 1 FROM json_each(r.attributes, {}) AS je WHERE {})",
                Self::path(name),
                condition("je.value", "je.type")
            ),
        }
    }

    fn null_check(&self) -> String {
        match self {
            Source::Column(col) => format!("({} IS NULL)", col),
            Source::Attribute(name) => format!(
                "(COALESCE(json_type(r.attributes, {}), 'null') = 'null')",
                Self::path(name)
            ),
        }
    }

    fn empty_check(&self) -> String {
        match self {
            Source::Column(col) => format!("({col} IS NULL OR {col} = '')"),
            Source::Attribute(name) => {
                let p = Self::path(name);
                format!(
                    "(COALESCE(json_type(r.attributes, {p}), 'null') = 'null' \
                     OR (json_type(r.attributes, {p}) = 'text' AND json_extract(r.attributes, {p}) = '') \
                     OR (json_type(r.attributes, {p}) = 'array' AND json_array_length(r.attributes, {p}) = 0))"
                )
            }
        }
    }

    fn sort_expr(&self) -> String {
        match self {
            Source::Column(col) => col.to_string(),
            Source::Attribute(name) => {
                format!("json_extract(r.attributes, {})", Self::path(name))
            }
        }
    }
}

fn comparison_op(lookup: Lookup) -> &'static str {
    match lookup {
        Lookup::Gt => ">",
        Lookup::Gte => ">=",
        Lookup::Lt => "<",
        Lookup::Lte => "<=",
        _ => "=",
    }
}

/// Builds the element-level condition comparing a value with `expected`.
///
/// `v` and `t` are the SQL expressions for the element value and its JSON
/// type name.
fn element_condition(
    frag: &mut SqlFragment,
    lookup: Lookup,
    expected: &PredicateValue,
) -> Option<Box<dyn Fn(&str, &str) -> String>> {
    let op = comparison_op(lookup);
    match (lookup, expected) {
        (Lookup::Exact, PredicateValue::Text(s)) => {
            let p = frag.add_param(SqlParam::string(s.clone()));
            Some(Box::new(move |v, t| {
                format!("({t} IN ('text', 'integer', 'real') AND CAST({v} AS TEXT) = {p})")
            }))
        }
        (l, PredicateValue::Text(s)) if l.is_text_pattern() => {
            let escaped = escape_like(&s.to_lowercase());
            let pattern = match l {
                Lookup::IContains => format!("%{}%", escaped),
                Lookup::IStartsWith => format!("{}%", escaped),
                Lookup::IEndsWith => format!("%{}", escaped),
                _ => escaped,
            };
            let p = frag.add_param(SqlParam::String(pattern));
            Some(Box::new(move |v, t| {
                format!(
                    "({t} IN ('text', 'integer', 'real') AND casefold(CAST({v} AS TEXT)) LIKE {p} ESCAPE '\\')"
                )
            }))
        }
        (l, PredicateValue::Text(s)) if l.is_range() => {
            let p = frag.add_param(SqlParam::string(s.clone()));
            Some(Box::new(move |v, t| format!("({t} = 'text' AND {v} {op} {p})")))
        }
        (_, PredicateValue::Integer(i)) if lookup == Lookup::Exact || lookup.is_range() => {
            let p = frag.add_param(SqlParam::Integer(*i));
            Some(Box::new(move |v, t| {
                format!("({t} IN ('integer', 'real') AND {v} {op} {p})")
            }))
        }
        (_, PredicateValue::Decimal(d)) if lookup == Lookup::Exact || lookup.is_range() => {
            let p = frag.add_param(SqlParam::Float(d.to_f64().unwrap_or_default()));
            Some(Box::new(move |v, t| {
                format!("({t} IN ('integer', 'real') AND {v} {op} {p})")
            }))
        }
        (Lookup::Exact, PredicateValue::Boolean(b)) => {
            let p = frag.add_param(SqlParam::Integer(i64::from(*b)));
            Some(Box::new(move |v, t| {
                format!("({t} IN ('true', 'false') AND {v} = {p})")
            }))
        }
        (_, PredicateValue::DateTime(dt)) if lookup == Lookup::Exact || lookup.is_range() => {
            let p = frag.add_param(SqlParam::String(dt.to_rfc3339()));
            Some(Box::new(move |v, t| {
                format!("({t} = 'text' AND julianday({v}) {op} julianday({p}))")
            }))
        }
        _ => None,
    }
}

/// Builds the SQL condition for one predicate.
fn predicate_condition(frag: &mut SqlFragment, predicate: &Predicate) -> String {
    let source = Source::of(&predicate.field);

    let condition = match (&predicate.lookup, &predicate.value) {
        (Lookup::Search, PredicateValue::Text(text)) => {
            let needle = escape_like(&text.to_lowercase());
            let p = frag.add_param(SqlParam::String(format!("%{}%", needle)));
            format!(
                "(casefold(r.label) LIKE {p} ESCAPE '\\' OR casefold(r.id) LIKE {p} ESCAPE '\\' \
                 OR EXISTS (SELECT 1 FROM json_tree(r.attributes) AS jt \
                 WHERE jt.type = 'text' AND casefold(jt.value) LIKE {p} ESCAPE '\\'))"
            )
        }
        (Lookup::IsNull, PredicateValue::Boolean(expected)) => {
            if *expected {
                source.null_check()
            } else {
                format!("NOT {}", source.null_check())
            }
        }
        (Lookup::Empty, PredicateValue::Boolean(expected)) => {
            if *expected {
                source.empty_check()
            } else {
                format!("NOT {}", source.empty_check())
            }
        }
        (Lookup::Exact, PredicateValue::Null) => source.null_check(),
        (Lookup::In, PredicateValue::Set(members)) => {
            let mut element_parts = Vec::new();
            let mut include_null = false;
            for member in members {
                if matches!(member, PredicateValue::Null) {
                    include_null = true;
                } else if let Some(cond) = element_condition(frag, Lookup::Exact, member) {
                    element_parts.push(cond);
                }
            }

            let mut alternatives = Vec::new();
            if !element_parts.is_empty() {
                alternatives.push(source.any_element(|v, t| {
                    element_parts
                        .iter()
                        .map(|c| c(v, t))
                        .collect::<Vec<_>>()
                        .join(" OR ")
                }));
            }
            if include_null {
                alternatives.push(source.null_check());
            }

            if alternatives.is_empty() {
                "0".to_string()
            } else {
                format!("({})", alternatives.join(" OR "))
            }
        }
        (lookup, expected) => match element_condition(frag, *lookup, expected) {
            Some(cond) => source.any_element(|v, t| cond(v, t)),
            None => "0".to_string(),
        },
    };

    if predicate.negated {
        format!("NOT COALESCE(({}), 0)", condition)
    } else {
        condition
    }
}

/// Builds `WHERE` conditions shared by select and count queries.
fn where_clause(frag: &mut SqlFragment, resource_type: &str, predicates: &[Predicate]) -> String {
    let rt = frag.add_param(SqlParam::string(resource_type));
    let mut conditions = vec![format!("r.resource_type = {}", rt)];
    for predicate in predicates {
        conditions.push(predicate_condition(frag, predicate));
    }
    conditions.join(" AND ")
}

/// Builds the page select for a store query.
///
/// One row beyond the requested limit is selected so callers can tell
/// whether another page follows.
pub fn build_select(query: &StoreQuery) -> SqlFragment {
    let mut frag = SqlFragment::default();
    let conditions = where_clause(&mut frag, &query.resource_type, &query.predicates);

    let mut order_terms: Vec<String> = query
        .ordering
        .iter()
        .map(|key: &SortKey| {
            let direction = if key.descending { "DESC" } else { "ASC" };
            format!("{} {}", Source::of(&key.field).sort_expr(), direction)
        })
        .collect();
    order_terms.push("r.id ASC".to_string());

    let limit = match query.pagination.limit {
        Some(limit) => i64::try_from(limit.saturating_add(1)).unwrap_or(i64::MAX),
        None => -1,
    };
    let limit = frag.add_param(SqlParam::Integer(limit));
    let offset = frag.add_param(SqlParam::Integer(
        i64::try_from(query.pagination.offset).unwrap_or(i64::MAX),
    ));

    frag.sql = format!(
        "SELECT r.resource_type, r.id, r.label, r.attributes FROM resources r \
         WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
        conditions,
        order_terms.join(", "),
        limit,
        offset
    );
    frag
}

/// Builds a count query.
pub fn build_count(resource_type: &str, predicates: &[Predicate]) -> SqlFragment {
    let mut frag = SqlFragment::default();
    let conditions = where_clause(&mut frag, resource_type, predicates);
    frag.sql = format!("SELECT COUNT(*) FROM resources r WHERE {}", conditions);
    frag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pagination;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn test_select_binds_type_and_page() {
        let query = StoreQuery::new("site").with_pagination(Pagination::new(40, 20));
        let frag = build_select(&query);
        assert!(frag.sql.contains("r.resource_type = ?1"));
        assert!(frag.sql.ends_with("LIMIT ?2 OFFSET ?3"));
        assert_eq!(
            frag.params,
            vec![
                SqlParam::string("site"),
                SqlParam::Integer(21),
                SqlParam::Integer(40)
            ]
        );
    }

    #[test]
    fn test_attribute_predicate_uses_json_each() {
        let query = StoreQuery::new("site")
            .with_predicate(Predicate::contains("facility", "dc"));
        let frag = build_select(&query);
        assert!(frag.sql.contains("json_each(r.attributes, '$.facility')"));
        assert_eq!(frag.params[1], SqlParam::string("%dc%"));
    }

    #[test]
    fn test_text_patterns_fold_both_sides() {
        let query = StoreQuery::new("site")
            .with_predicate(Predicate::contains("facility", "ÉCLAIR"))
            .with_predicate(Predicate::search("ZÜRICH"));
        let frag = build_select(&query);
        assert!(frag.sql.contains("casefold(CAST(je.value AS TEXT)) LIKE ?2"));
        assert!(frag.sql.contains("casefold(r.label) LIKE ?3"));
        assert_eq!(frag.params[1], SqlParam::string("%éclair%"));
        assert_eq!(frag.params[2], SqlParam::string("%zürich%"));
    }

    #[test]
    fn test_membership_with_null() {
        let query = StoreQuery::new("rack").with_predicate(Predicate::one_of(
            "location_id",
            vec![PredicateValue::text("loc-1"), PredicateValue::Null],
        ));
        let frag = build_select(&query);
        assert!(frag.sql.contains("json_type(r.attributes, '$.location_id')"));
        assert!(frag.sql.contains(" OR "));
    }

    #[test]
    fn test_negation_coalesces() {
        let query = StoreQuery::new("site").with_predicate(
            Predicate::exact("status", PredicateValue::text("active")).negate(),
        );
        let frag = build_select(&query);
        assert!(frag.sql.contains("NOT COALESCE(("));
    }

    #[test]
    fn test_order_by_appends_id() {
        let query = StoreQuery::new("site").with_ordering(vec![SortKey::desc("facility")]);
        let frag = build_select(&query);
        assert!(frag.sql.contains(
            "ORDER BY json_extract(r.attributes, '$.facility') DESC, r.id ASC"
        ));
    }

    #[test]
    fn test_count_query() {
        let frag = build_count("device", &[Predicate::search("core")]);
        assert!(frag.sql.starts_with("SELECT COUNT(*) FROM resources r"));
        assert!(frag.sql.contains("json_tree"));
        assert_eq!(frag.params.len(), 2);
    }
}
