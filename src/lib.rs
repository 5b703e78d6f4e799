//! Facade crate for the Yatra destination catalog.
//!
//! This crate re-exports the core catalog types and exposes the REST-backed
//! sources behind the `rest` feature flag.

#![forbid(unsafe_code)]

pub use yatra_core::{
    Activation, CatalogSession, Category, DEFAULT_QUIET_PERIOD, Debouncer, DestinationRecord,
    FACET_OPTIONS, FacetDimension, FacetOption, FacetSelection, FavoriteChange, FavoriteSource,
    FavoriteState, FavoriteSync, FetchError, LoadOutcome, LoadState, MAX_RATING, Notice,
    PlaceType, QueryState, RecordId, RecordSource, RecordStore, SessionGate, Severity,
    SourceError, ToggleError, UserId, WatchSessionGate, facet_option, filter, matches_terms,
    options_for, search_terms,
};

#[cfg(feature = "test-support")]
pub use yatra_core::test_support;

#[cfg(feature = "rest")]
pub use yatra_data::rest;
