//! Raw query string extractor.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use rackline_filters::FormData;

/// Axum extractor that collects the query string as [`FormData`].
///
/// Repeated parameters keep every value, so `?status=active&status=planned`
/// submits both statuses. Percent-encoding and `+` are decoded.
///
/// # Example
///
/// ```rust,ignore
/// use rackline_rest::extractors::FilterQuery;
///
/// async fn handler(FilterQuery(filters): FilterQuery) {
///     let statuses = filters.get("status");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterQuery(pub FormData);

impl FilterQuery {
    /// Parses a raw query string.
    pub fn parse(query: &str) -> Self {
        Self(FormData::from_pairs(
            url::form_urlencoded::parse(query.as_bytes()).into_owned(),
        ))
    }

    /// Consumes the extractor.
    pub fn into_inner(self) -> FormData {
        self.0
    }
}

impl<S> FromRequestParts<S> for FilterQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.uri.query().map(Self::parse).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_parameters_kept() {
        let FilterQuery(data) = FilterQuery::parse("status=active&status=planned&region_id=region-42");
        assert_eq!(
            data.get("status"),
            Some(&["active".to_string(), "planned".to_string()][..])
        );
        assert_eq!(data.last_value("region_id"), Some("region-42"));
    }

    #[test]
    fn test_decoding() {
        let FilterQuery(data) = FilterQuery::parse("q=main+hall&serial=AB%2F12&empty=");
        assert_eq!(data.last_value("q"), Some("main hall"));
        assert_eq!(data.last_value("serial"), Some("AB/12"));
        assert_eq!(data.last_value("empty"), Some(""));
    }

    #[test]
    fn test_empty_query() {
        assert!(FilterQuery::parse("").into_inner().is_empty());
    }
}
