//! Test utilities for the REST sources.
//!
//! [`StubRestSource`] answers with canned response bodies, decoded by the
//! same code the HTTP client uses, so wire-format handling can be checked
//! without a running service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use yatra_core::{DestinationRecord, FavoriteSource, RecordId, RecordSource, SourceError, UserId};

use super::rows::{decode_favorites, decode_records};

#[derive(Debug, Clone)]
enum StubResponse {
    Body(String),
    Error(SourceError),
}

impl StubResponse {
    fn body(&self) -> Result<&str, SourceError> {
        match self {
            Self::Body(body) => Ok(body),
            Self::Error(error) => Err(error.clone()),
        }
    }
}

#[derive(Debug, Default)]
struct StubState {
    places: Option<StubResponse>,
    favorites: HashMap<UserId, StubResponse>,
    write_error: Option<SourceError>,
    writes: Vec<(UserId, RecordId, bool)>,
}

/// Record and favorite source returning pre-configured response bodies.
///
/// # Example
///
/// ```
/// use yatra_core::{RecordSource, test_support::block_on};
/// use yatra_data::rest::test_support::StubRestSource;
///
/// let source = StubRestSource::with_places_body(
///     r#"[{"id": "a", "name": "Rumtek", "category": "monastery", "place_type": "monastery"}]"#,
/// );
/// let records = block_on(source.fetch_active()).expect("body decodes");
/// assert_eq!(records[0].name, "Rumtek");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubRestSource {
    state: Arc<Mutex<StubState>>,
}

fn lock(state: &Mutex<StubState>) -> MutexGuard<'_, StubState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StubRestSource {
    /// Answer catalog requests with `body`.
    #[must_use]
    pub fn with_places_body(body: impl Into<String>) -> Self {
        let source = Self::default();
        lock(&source.state).places = Some(StubResponse::Body(body.into()));
        source
    }

    /// Answer catalog requests with `error`.
    #[must_use]
    pub fn with_places_error(error: SourceError) -> Self {
        let source = Self::default();
        lock(&source.state).places = Some(StubResponse::Error(error));
        source
    }

    /// Answer favorites requests for `user` with `body`.
    pub fn set_favorites_body(&self, user: &UserId, body: impl Into<String>) {
        lock(&self.state)
            .favorites
            .insert(user.clone(), StubResponse::Body(body.into()));
    }

    /// Fail every insert and delete with `error`.
    pub fn fail_writes(&self, error: SourceError) {
        lock(&self.state).write_error = Some(error);
    }

    /// Writes accepted so far as `(user, record, inserted)`.
    pub fn writes(&self) -> Vec<(UserId, RecordId, bool)> {
        lock(&self.state).writes.clone()
    }

    fn write(&self, user: &UserId, record: &RecordId, inserted: bool) -> Result<(), SourceError> {
        let mut state = lock(&self.state);
        if let Some(error) = &state.write_error {
            return Err(error.clone());
        }
        state.writes.push((user.clone(), record.clone(), inserted));
        Ok(())
    }
}

#[async_trait]
impl RecordSource for StubRestSource {
    async fn fetch_active(&self) -> Result<Vec<DestinationRecord>, SourceError> {
        let response = lock(&self.state).places.clone();
        match response {
            Some(response) => decode_records(response.body()?),
            None => decode_records("[]"),
        }
    }
}

#[async_trait]
impl FavoriteSource for StubRestSource {
    async fn list(&self, user: &UserId) -> Result<Vec<RecordId>, SourceError> {
        let response = lock(&self.state).favorites.get(user).cloned();
        match response {
            Some(response) => decode_favorites(response.body()?),
            None => Ok(Vec::new()),
        }
    }

    async fn insert(&self, user: &UserId, record: &RecordId) -> Result<(), SourceError> {
        self.write(user, record, true)
    }

    async fn delete(&self, user: &UserId, record: &RecordId) -> Result<(), SourceError> {
        self.write(user, record, false)
    }
}
