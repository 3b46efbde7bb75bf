//! Axum extractors for list and choice requests.
//!
//! - [`FilterQuery`] - every query string parameter as raw filter input
//! - [`ListParams`] - the reserved `offset`, `limit` and `ordering`
//!   parameters, split off from the filters

mod filter_query;
mod pagination;

pub use filter_query::FilterQuery;
pub use pagination::{LIMIT_PARAM, ListParams, OFFSET_PARAM, ORDERING_PARAM};
