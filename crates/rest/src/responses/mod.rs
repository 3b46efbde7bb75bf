//! JSON response bodies.
//!
//! - [`ListEnvelope`] - one page of records with paging metadata
//! - [`ChoiceList`] - candidate choices for one field
//! - [`TypeIndex`] - the registered resource types

mod envelope;

pub use envelope::{ChoiceList, ListEnvelope, TypeIndex, TypeSummary};
