//! Core engine for the Yatra destination catalog.
//!
//! The engine loads a catalog of destination records, narrows it with free
//! text and facet tags, and tracks which records the signed-in user has
//! favorited. Favorite toggles are optimistic: the change is visible at once
//! and rolled back if the remote write fails.
//!
//! Remote access goes through the [`RecordSource`] and [`FavoriteSource`]
//! traits and identity through [`SessionGate`], so hosts plug in their own
//! backends. In-memory implementations live in [`test_support`] behind the
//! `test-support` feature.

#![forbid(unsafe_code)]

mod catalog;
mod debounce;
mod error;
mod facet;
mod favorites;
mod filter;
mod notice;
mod query;
mod record;
mod session;
mod source;
mod store;
mod vocabulary;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use catalog::{Activation, CatalogSession, LoadState};
pub use debounce::{DEFAULT_QUIET_PERIOD, Debouncer};
pub use error::{FetchError, ToggleError};
pub use facet::{FACET_OPTIONS, FacetDimension, FacetOption, FacetSelection, facet_option, options_for};
pub use favorites::{FavoriteChange, FavoriteState, FavoriteSync, LoadOutcome};
pub use filter::{filter, matches_terms, search_terms};
pub use notice::{Notice, Severity};
pub use query::QueryState;
pub use record::{DestinationRecord, MAX_RATING, RecordId};
pub use session::{SessionGate, UserId, WatchSessionGate};
pub use source::{FavoriteSource, RecordSource, SourceError};
pub use store::RecordStore;
pub use vocabulary::{Category, PlaceType};
