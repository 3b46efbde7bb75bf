//! HTTP request handlers.
//!
//! - [`list`] - filtered, ordered, paged lists
//! - [`read`] - one record by id
//! - [`form`] - a type's form description
//! - [`choices`] - candidate choices for one field
//! - [`types`] - the registered resource types
//! - [`health`] - health and readiness probes

pub mod choices;
pub mod form;
pub mod health;
pub mod list;
pub mod read;
pub mod types;

pub use choices::choices_handler;
pub use form::form_handler;
pub use health::health_handler;
pub use list::list_handler;
pub use read::read_handler;
pub use types::types_handler;
