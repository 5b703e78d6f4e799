//! Errors surfaced by the record store and favorite synchronisation.

use thiserror::Error;

use crate::{RecordId, SourceError, UserId};

/// A remote read failed.
///
/// A failed catalog read leaves the previous snapshot untouched; a failed
/// favorites read leaves the membership set empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The destination catalog could not be fetched.
    #[error("failed to fetch destination records: {0}")]
    Records(#[source] SourceError),
    /// The favorites list for a user could not be fetched.
    #[error("failed to fetch favorites for user {user}: {source}")]
    Favorites {
        /// User whose favorites were requested.
        user: UserId,
        /// Underlying source failure.
        #[source]
        source: SourceError,
    },
}

/// A favorite toggle did not take effect.
///
/// Both variants leave the membership set exactly as it was before the
/// toggle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    /// Nobody is signed in; no remote call was made.
    #[error("sign in to save favorites")]
    AuthRequired,
    /// The remote write failed and the optimistic change was rolled back.
    #[error("failed to update favorite {record_id}: {source}")]
    Sync {
        /// Record whose favorite state was being changed.
        record_id: RecordId,
        /// Underlying source failure.
        #[source]
        source: SourceError,
    },
}
