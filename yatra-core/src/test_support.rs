//! In-memory sources and fixtures used by unit and behaviour tests.
//!
//! The favorite source can be told to fail or to hold calls behind a
//! [`Gate`], which lets tests observe optimistic intermediate states
//! without racing a real network call.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::{
    Category, DestinationRecord, FavoriteSource, PlaceType, RecordId, RecordSource, SourceError,
    UserId,
};

/// Drive a future to completion on a fresh current-thread runtime.
///
/// # Panics
/// Panics if the runtime cannot be built.
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("current-thread runtime should build")
        .block_on(future)
}

/// The two-record catalog used throughout the filtering scenarios.
pub fn scenario_records() -> Vec<DestinationRecord> {
    vec![
        DestinationRecord::new("a", "Rumtek Monastery", Category::Monastery, PlaceType::Monastery)
            .with_rating(4.5),
        DestinationRecord::new("b", "Tsomgo Lake", Category::NaturePoint, PlaceType::Lake)
            .with_rating(4.2),
    ]
}

/// A broader catalog covering every category.
pub fn sample_catalog() -> Vec<DestinationRecord> {
    vec![
        DestinationRecord::new("rumtek", "Rumtek Monastery", Category::Monastery, PlaceType::Monastery)
            .with_rating(4.5)
            .with_address("Rumtek, East Sikkim")
            .with_features(["Golden Stupa", "Prayer wheels"])
            .featured(),
        DestinationRecord::new("tsomgo", "Tsomgo Lake", Category::NaturePoint, PlaceType::Lake)
            .with_rating(4.2)
            .with_description("Glacial lake on the road to Nathula.")
            .with_altitude(3753.0),
        DestinationRecord::new("tiger-hill", "Tiger Hill", Category::TouristSpot, PlaceType::Viewpoint)
            .with_rating(4.6)
            .with_features(["Sunrise", "Kanchenjunga view"]),
        DestinationRecord::new("mayfair", "Mayfair Spa Resort & Casino", Category::Hotel, PlaceType::Hotel)
            .with_rating(4.8)
            .with_address("Gangtok")
            .with_features(["Spa", "Casino", "Mountain View"]),
        DestinationRecord::new("losar", "Losar Festival", Category::Festival, PlaceType::Festival)
            .with_description("Tibetan new year celebrated across the monasteries."),
        DestinationRecord::new("namgyal", "Namgyal Institute of Tibetology", Category::CulturalSite, PlaceType::Temple)
            .with_rating(4.3)
            .with_address("Deorali, Gangtok"),
    ]
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct RecordSourceState {
    records: Vec<DestinationRecord>,
    failure: Option<SourceError>,
    fetches: usize,
}

/// [`RecordSource`] returning a configurable in-memory list.
///
/// Clones share state, so a test can keep a handle after moving one into a
/// store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordSource {
    state: Arc<Mutex<RecordSourceState>>,
}

impl MemoryRecordSource {
    /// A source returning `records`.
    pub fn with_records(records: Vec<DestinationRecord>) -> Self {
        let source = Self::default();
        source.set_records(records);
        source
    }

    /// Replace the records returned by later fetches.
    pub fn set_records(&self, records: Vec<DestinationRecord>) {
        lock(&self.state).records = records;
    }

    /// Make every later fetch fail with `error`.
    pub fn fail_with(&self, error: SourceError) {
        lock(&self.state).failure = Some(error);
    }

    /// Stop failing.
    pub fn recover(&self) {
        lock(&self.state).failure = None;
    }

    /// Number of fetches issued so far.
    pub fn fetch_count(&self) -> usize {
        lock(&self.state).fetches
    }
}

#[async_trait]
impl RecordSource for MemoryRecordSource {
    async fn fetch_active(&self) -> Result<Vec<DestinationRecord>, SourceError> {
        let mut state = lock(&self.state);
        state.fetches += 1;
        match &state.failure {
            Some(error) => Err(error.clone()),
            None => Ok(state.records.clone()),
        }
    }
}

/// Holds calls until the test releases them, one permit per call.
#[derive(Debug, Clone)]
pub struct Gate {
    permits: Arc<Semaphore>,
}

impl Gate {
    fn closed() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(0)),
        }
    }

    /// Let one held call proceed.
    pub fn release(&self) {
        self.permits.add_permits(1);
    }

    async fn pass(&self) -> Result<(), SourceError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| SourceError::rejected("gate closed"))?;
        permit.forget();
        Ok(())
    }
}

/// A call observed by [`MemoryFavoriteSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteCall {
    /// `list(user)`.
    List(UserId),
    /// `insert(user, record)`.
    Insert(UserId, RecordId),
    /// `delete(user, record)`.
    Delete(UserId, RecordId),
}

#[derive(Debug, Default)]
struct FavoriteSourceState {
    favorites: HashMap<UserId, BTreeSet<RecordId>>,
    queued_write_failures: VecDeque<SourceError>,
    write_failure: Option<SourceError>,
    list_failure: Option<SourceError>,
    calls: Vec<FavoriteCall>,
}

#[derive(Debug, Default)]
struct FavoriteSourceInner {
    state: Mutex<FavoriteSourceState>,
    write_gate: Mutex<Option<Gate>>,
    list_gates: Mutex<HashMap<UserId, Gate>>,
}

/// [`FavoriteSource`] storing favorites per user in memory.
///
/// Calls are logged before any gate is awaited, so a test can assert that
/// a remote call was issued while it is still pending.
#[derive(Debug, Clone, Default)]
pub struct MemoryFavoriteSource {
    inner: Arc<FavoriteSourceInner>,
}

impl MemoryFavoriteSource {
    /// A source where `user` has already favorited `records`.
    pub fn with_favorites<I, R>(user: &UserId, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RecordId>,
    {
        let source = Self::default();
        source.add_favorites(user, records);
        source
    }

    /// Persist `records` as favorites of `user` without logging a call.
    pub fn add_favorites<I, R>(&self, user: &UserId, records: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<RecordId>,
    {
        lock(&self.inner.state)
            .favorites
            .entry(user.clone())
            .or_default()
            .extend(records.into_iter().map(Into::into));
    }

    /// Fail the next write with `error`; later writes succeed again.
    pub fn fail_next_write(&self, error: SourceError) {
        lock(&self.inner.state).queued_write_failures.push_back(error);
    }

    /// Fail every write with `error`.
    pub fn fail_writes(&self, error: SourceError) {
        lock(&self.inner.state).write_failure = Some(error);
    }

    /// Fail every list call with `error`.
    pub fn fail_lists(&self, error: SourceError) {
        lock(&self.inner.state).list_failure = Some(error);
    }

    /// Hold every later write until the returned gate is released.
    pub fn hold_writes(&self) -> Gate {
        let gate = Gate::closed();
        *lock(&self.inner.write_gate) = Some(gate.clone());
        gate
    }

    /// Hold later list calls for `user` until the returned gate is released.
    pub fn hold_lists_for(&self, user: &UserId) -> Gate {
        let gate = Gate::closed();
        lock(&self.inner.list_gates).insert(user.clone(), gate.clone());
        gate
    }

    /// Favorites currently persisted for `user`.
    pub fn stored(&self, user: &UserId) -> BTreeSet<RecordId> {
        lock(&self.inner.state)
            .favorites
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<FavoriteCall> {
        lock(&self.inner.state).calls.clone()
    }

    /// Number of insert and delete calls observed.
    pub fn write_count(&self) -> usize {
        lock(&self.inner.state)
            .calls
            .iter()
            .filter(|call| !matches!(call, FavoriteCall::List(_)))
            .count()
    }

    fn record_call(&self, call: FavoriteCall) {
        lock(&self.inner.state).calls.push(call);
    }

    async fn write(
        &self,
        call: FavoriteCall,
        user: &UserId,
        apply: impl FnOnce(&mut BTreeSet<RecordId>) + Send,
    ) -> Result<(), SourceError> {
        self.record_call(call);
        let gate = lock(&self.inner.write_gate).clone();
        if let Some(gate) = gate {
            gate.pass().await?;
        }
        let mut state = lock(&self.inner.state);
        if let Some(error) = state.queued_write_failures.pop_front() {
            return Err(error);
        }
        if let Some(error) = &state.write_failure {
            return Err(error.clone());
        }
        apply(state.favorites.entry(user.clone()).or_default());
        Ok(())
    }
}

#[async_trait]
impl FavoriteSource for MemoryFavoriteSource {
    async fn list(&self, user: &UserId) -> Result<Vec<RecordId>, SourceError> {
        self.record_call(FavoriteCall::List(user.clone()));
        let gate = lock(&self.inner.list_gates).get(user).cloned();
        if let Some(gate) = gate {
            gate.pass().await?;
        }
        let state = lock(&self.inner.state);
        if let Some(error) = &state.list_failure {
            return Err(error.clone());
        }
        Ok(state
            .favorites
            .get(user)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, user: &UserId, record: &RecordId) -> Result<(), SourceError> {
        let call = FavoriteCall::Insert(user.clone(), record.clone());
        self.write(call, user, |ids| {
            ids.insert(record.clone());
        })
        .await
    }

    async fn delete(&self, user: &UserId, record: &RecordId) -> Result<(), SourceError> {
        let call = FavoriteCall::Delete(user.clone(), record.clone());
        self.write(call, user, |ids| {
            ids.remove(record);
        })
        .await
    }
}
