//! Presentation-facing session over the catalog, query and favorites.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::{
    Debouncer, DestinationRecord, FacetSelection, FavoriteSource, FavoriteSync, FetchError,
    LoadOutcome, Notice, QueryState, RecordId, RecordSource, RecordStore, SessionGate,
};

/// Progress of the catalog load backing a [`CatalogSession`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No load has been attempted.
    #[default]
    Idle,
    /// The catalog is available.
    Ready,
    /// The last load failed; nothing is shown.
    Failed(FetchError),
}

/// What [`CatalogSession::activate`] achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Number of records in the catalog.
    pub records: usize,
    /// Favorites load result, when somebody was signed in.
    pub favorites: Option<LoadOutcome>,
    /// Non-blocking notice to show, e.g. a degraded favorites load.
    pub notice: Option<Notice>,
}

/// Everything a catalog screen needs in one place.
///
/// The favorites half is held behind an [`Arc`] so a host can run
/// [`FavoriteSync::follow`] on it alongside the session.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use yatra_core::test_support::{MemoryFavoriteSource, MemoryRecordSource, block_on, sample_catalog};
/// use yatra_core::{CatalogSession, FavoriteSync, WatchSessionGate};
///
/// let favorites = Arc::new(FavoriteSync::new(
///     MemoryFavoriteSource::default(),
///     WatchSessionGate::anonymous(),
/// ));
/// let mut session = CatalogSession::new(MemoryRecordSource::with_records(sample_catalog()), favorites);
/// block_on(session.activate()).expect("catalog loads");
///
/// session.set_query("gangtok");
/// assert_eq!(session.filtered_records().len(), 2);
/// ```
#[derive(Debug)]
pub struct CatalogSession<R, F, G> {
    store: RecordStore<R>,
    query: QueryState,
    favorites: Arc<FavoriteSync<F, G>>,
    state: LoadState,
    debouncer: Debouncer,
    typed: Option<String>,
}

impl<R, F, G> CatalogSession<R, F, G>
where
    R: RecordSource,
    F: FavoriteSource,
    G: SessionGate,
{
    /// Construct an idle session.
    pub fn new(records: R, favorites: Arc<FavoriteSync<F, G>>) -> Self {
        Self {
            store: RecordStore::new(records),
            query: QueryState::new(),
            favorites,
            state: LoadState::Idle,
            debouncer: Debouncer::default(),
            typed: None,
        }
    }

    /// Use `quiet_period` instead of the default typing debounce.
    #[must_use]
    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.debouncer = Debouncer::new(quiet_period);
        self
    }

    /// Load the catalog and, if somebody is signed in, their favorites.
    ///
    /// A favorites failure does not fail activation: the set stays empty
    /// and the returned [`Activation`] carries a notice.
    ///
    /// # Errors
    /// Returns [`FetchError::Records`] when the catalog cannot be fetched.
    /// [`CatalogSession::load_state`] is then [`LoadState::Failed`].
    pub async fn activate(&mut self) -> Result<Activation, FetchError> {
        let records = match self.store.load().await {
            Ok(count) => count,
            Err(err) => {
                self.state = LoadState::Failed(err.clone());
                return Err(err);
            }
        };
        self.state = LoadState::Ready;

        let Some(user) = self.favorites.gate().current() else {
            debug!("activated anonymously with {records} records");
            return Ok(Activation {
                records,
                favorites: None,
                notice: None,
            });
        };
        let (favorites, notice) = match self.favorites.load_for(user).await {
            Ok(outcome) => (Some(outcome), None),
            Err(err) => {
                warn!("continuing without favorites: {err}");
                (None, Some(Notice::from(&err)))
            }
        };
        Ok(Activation {
            records,
            favorites,
            notice,
        })
    }

    /// Flip the favorite state of `record_id` and describe the outcome.
    pub async fn toggle_favorite(&self, record_id: &RecordId) -> Notice {
        Notice::for_toggle(&self.favorites.toggle(record_id).await)
    }
}

impl<R, F, G> CatalogSession<R, F, G> {
    /// Records matching the current query, in catalog order.
    ///
    /// Empty while the catalog has not loaded or its last load failed.
    pub fn filtered_records(&self) -> Vec<&DestinationRecord> {
        match self.state {
            LoadState::Ready => self.query.apply(self.store.records()),
            LoadState::Idle | LoadState::Failed(_) => Vec::new(),
        }
    }

    /// Favorited records in catalog order, ignoring the query.
    pub fn favorite_records(&self) -> Vec<&DestinationRecord> {
        if self.state != LoadState::Ready {
            return Vec::new();
        }
        self.store
            .records()
            .iter()
            .filter(|record| self.favorites.is_favorited(&record.id))
            .collect()
    }

    /// Whether `record_id` currently shows as favorited.
    pub fn is_favorited(&self, record_id: &RecordId) -> bool {
        self.favorites.is_favorited(record_id)
    }

    /// Look up a loaded record.
    pub fn record(&self, id: &str) -> Option<&DestinationRecord> {
        self.store.get(id)
    }

    /// Replace the query text immediately.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.typed = None;
        self.query.set_query(text);
    }

    /// Note a keystroke; the text applies once [`CatalogSession::settle`]
    /// sees the quiet period elapse.
    pub fn type_query(&mut self, text: impl Into<String>, now: Instant) {
        self.typed = Some(text.into());
        self.debouncer.note_input(now);
    }

    /// Apply typed text if input has been quiet long enough.
    ///
    /// Returns `true` when the query changed.
    pub fn settle(&mut self, now: Instant) -> bool {
        if !self.debouncer.take_if_settled(now) {
            return false;
        }
        match self.typed.take() {
            Some(text) => {
                self.query.set_query(text);
                true
            }
            None => false,
        }
    }

    /// Empty the query text, discarding unsettled typing.
    pub fn clear_query(&mut self) {
        self.typed = None;
        self.query.clear_query();
    }

    /// Replace the facet selection.
    pub fn set_facets(&mut self, facets: FacetSelection) {
        self.query.set_facets(facets);
    }

    /// Toggle one facet tag; returns whether it is now selected.
    pub fn toggle_facet(&mut self, tag: &str) -> bool {
        self.query.toggle_facet(tag)
    }

    /// Deselect every facet.
    pub fn clear_facets(&mut self) {
        self.query.clear_facets();
    }

    /// Current query.
    pub const fn query(&self) -> &QueryState {
        &self.query
    }

    /// Catalog load progress.
    pub const fn load_state(&self) -> &LoadState {
        &self.state
    }

    /// Shared favorites synchroniser.
    pub fn favorite_sync(&self) -> &Arc<FavoriteSync<F, G>> {
        &self.favorites
    }
}
