//! # rackline-filters
//!
//! Filter forms and filtered list resolution for the Rackline inventory.
//!
//! Every listable resource type has an optional [`FilterForm`]: a set of
//! optional search inputs, some of which narrow the candidate choices of
//! others (a site picker offers only the sites of the selected regions).
//!
//! The request flow is:
//!
//! 1. Raw arguments arrive as [`FormData`] (query string pairs or GraphQL
//!    arguments).
//! 2. [`FilterForm::validate`] checks them against the declared fields and
//!    collects per-field errors into [`FieldErrors`].
//! 3. [`build_predicates`] turns the cleaned values into store predicates.
//! 4. [`ListResolver`] executes the predicates against a
//!    [`ResourceStore`](rackline_persistence::core::ResourceStore) with
//!    ordering and pagination.
//!
//! Candidate choices for dependent fields are computed by
//! [`DependentChoiceResolver`], which settles parents in topological order.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rackline_filters::{FormData, ListArgs, ListResolver, catalog};
//! use rackline_persistence::backends::memory::MemoryStore;
//!
//! let registry = Arc::new(catalog::builtin_registry()?);
//! let resolver = ListResolver::new(Arc::new(MemoryStore::new()), registry);
//!
//! let filters = FormData::from_pairs([("region_id", "region-42"), ("status", "active")]);
//! let page = resolver.resolve_list("site", &ListArgs::new(filters)).await?;
//! ```

#![warn(missing_docs)]

pub mod arguments;
pub mod catalog;
pub mod choices;
pub mod data;
pub mod error;
pub mod field;
pub mod form;
pub mod lookup;
pub mod predicates;
pub mod registry;
pub mod resolver;
pub mod tags;
pub mod validate;

pub use arguments::{Argument, ArgumentShape, FormDescription, arguments};
pub use choices::{DEFAULT_CHOICE_PAGE_SIZE, DependentChoiceResolver};
pub use data::FormData;
pub use error::{ConfigError, FieldErrors, ResolveError, ResolveResult};
pub use field::{Choice, ChoiceSource, FieldDeclaration, FieldKind, NULL_TOKEN, ResourceQuery};
pub use form::{
    FilterCapability, FilterForm, Fieldset, FormBuilder, FormSpec, HasDependencies, HasFields, load_specs,
};
pub use lookup::LookupSuffix;
pub use predicates::build_predicates;
pub use registry::{FormRegistry, FormRegistryBuilder};
pub use resolver::{ListArgs, ListResolver, filter_predicates, parse_ordering, resolve_list_with};
pub use tags::{Tag, slugify};
pub use validate::{CleanedData, CleanedValue, TypedValue};
