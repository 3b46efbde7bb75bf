//! Reserved list parameters.
//!
//! `offset`, `limit` and `ordering` control the page rather than filter it,
//! so they are removed from the filter input before validation.

use rackline_filters::{FormData, parse_ordering};
use rackline_persistence::types::{Pagination, SortKey};

use crate::config::ServerConfig;
use crate::error::{RestError, RestResult};

/// Number of records to skip.
pub const OFFSET_PARAM: &str = "offset";
/// Page size.
pub const LIMIT_PARAM: &str = "limit";
/// Comma-separated sort keys, `-` for descending.
pub const ORDERING_PARAM: &str = "ordering";

/// Paging and ordering requested for a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Records to skip.
    pub offset: usize,
    /// Requested page size, before clamping.
    pub limit: Option<usize>,
    /// Requested ordering; empty means the form's default.
    pub ordering: Vec<SortKey>,
}

impl ListParams {
    /// Removes the reserved parameters from `filters` and parses them.
    ///
    /// A blank value counts as absent.
    pub fn take_from(filters: &mut FormData) -> RestResult<Self> {
        let offset = take_number(filters, OFFSET_PARAM)?.unwrap_or(0);
        let limit = take_number(filters, LIMIT_PARAM)?;
        let ordering = match take_last(filters, ORDERING_PARAM) {
            Some(raw) => parse_ordering(&raw)?,
            None => Vec::new(),
        };
        Ok(Self {
            offset,
            limit,
            ordering,
        })
    }

    /// Returns the store pagination, with the limit clamped by `config`.
    pub fn pagination(&self, config: &ServerConfig) -> Pagination {
        Pagination::new(self.offset, config.page_size(self.limit))
    }
}

fn take_last(filters: &mut FormData, name: &str) -> Option<String> {
    filters
        .remove(name)
        .and_then(|mut values| values.pop())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn take_number(filters: &mut FormData, name: &str) -> RestResult<Option<usize>> {
    take_last(filters, name)
        .map(|raw| {
            raw.parse::<usize>().map_err(|_| RestError::BadRequest {
                message: format!("'{}' must be a non-negative integer, got '{}'", name, raw),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_parameters_removed() {
        let mut filters = FormData::from_pairs([
            ("status", "active"),
            ("offset", "20"),
            ("limit", "5"),
            ("ordering", "-created,label"),
        ]);
        let params = ListParams::take_from(&mut filters).unwrap();

        assert_eq!(params.offset, 20);
        assert_eq!(params.limit, Some(5));
        assert_eq!(params.ordering, vec![SortKey::desc("created"), SortKey::asc("label")]);
        assert_eq!(filters, FormData::from_pairs([("status", "active")]));
    }

    #[test]
    fn test_defaults_and_blank_values() {
        let mut filters = FormData::from_pairs([("limit", ""), ("ordering", " ")]);
        let params = ListParams::take_from(&mut filters).unwrap();
        assert_eq!(params, ListParams::default());
        assert!(filters.is_empty());
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let mut filters = FormData::from_pairs([("offset", "-1")]);
        let err = ListParams::take_from(&mut filters).unwrap_err();
        assert!(err.to_string().contains("offset"));

        let mut filters = FormData::from_pairs([("limit", "ten")]);
        assert!(ListParams::take_from(&mut filters).is_err());
    }

    #[test]
    fn test_invalid_ordering_rejected() {
        let mut filters = FormData::from_pairs([("ordering", "label;drop")]);
        assert!(matches!(
            ListParams::take_from(&mut filters),
            Err(RestError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_pagination_clamped() {
        let config = ServerConfig::for_testing();
        let params = ListParams {
            offset: 3,
            limit: Some(10_000),
            ordering: Vec::new(),
        };
        assert_eq!(params.pagination(&config), Pagination::new(3, 100));
    }
}
