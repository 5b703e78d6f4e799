//! In-memory snapshot of the destination catalog.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::{DestinationRecord, FetchError, RecordSource};

/// Holds the canonical record sequence fetched from a [`RecordSource`].
///
/// The snapshot is immutable between loads: [`RecordStore::all`] hands out
/// a shared slice and a failed [`RecordStore::load`] never touches it.
/// `load` takes `&mut self`, so two loads on one store cannot overlap.
pub struct RecordStore<S> {
    source: S,
    snapshot: Arc<[DestinationRecord]>,
    loaded: bool,
}

impl<S> fmt::Debug for RecordStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.snapshot.len())
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

impl<S: RecordSource> RecordStore<S> {
    /// Construct an empty store reading from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: Arc::from(Vec::new()),
            loaded: false,
        }
    }

    /// Fetch the active records and replace the snapshot.
    ///
    /// Issues exactly one source call. Records are ordered featured first,
    /// then by rating descending; ties keep source order. Duplicate ids keep
    /// their first occurrence.
    ///
    /// # Errors
    /// Returns [`FetchError::Records`] when the source fails; the previous
    /// snapshot is retained.
    pub async fn load(&mut self) -> Result<usize, FetchError> {
        debug!("loading destination records");
        let fetched = self.source.fetch_active().await.map_err(|source| {
            warn!("destination load failed, keeping {} records: {source}", self.snapshot.len());
            FetchError::Records(source)
        })?;
        let records = canonicalise(fetched);
        let count = records.len();
        self.snapshot = Arc::from(records);
        self.loaded = true;
        debug!("loaded {count} destination records");
        Ok(count)
    }
}

impl<S> RecordStore<S> {
    /// Shared handle to the current snapshot.
    pub fn all(&self) -> Arc<[DestinationRecord]> {
        Arc::clone(&self.snapshot)
    }

    /// Borrow the current snapshot.
    pub fn records(&self) -> &[DestinationRecord] {
        &self.snapshot
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&DestinationRecord> {
        self.snapshot.iter().find(|record| record.id.as_str() == id)
    }

    /// Number of records in the snapshot.
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Whether at least one load has succeeded.
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }
}

fn canonicalise(fetched: Vec<DestinationRecord>) -> Vec<DestinationRecord> {
    let mut seen = HashSet::with_capacity(fetched.len());
    let mut records: Vec<_> = fetched
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.id.clone());
            if !fresh {
                warn!("dropping duplicate destination record {}", record.id);
            }
            fresh
        })
        .collect();
    records.sort_by(catalog_order);
    records
}

fn catalog_order(a: &DestinationRecord, b: &DestinationRecord) -> Ordering {
    b.is_featured
        .cmp(&a.is_featured)
        .then_with(|| b.rating.total_cmp(&a.rating))
}
