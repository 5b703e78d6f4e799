//! Traits for the remote stores the engine reads from and writes to.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{DestinationRecord, RecordId, UserId};

use super::error::SourceError;

/// Remote query returning the active destination records.
///
/// Implementations should order results by `is_featured` descending, then
/// `rating` descending. The record store re-applies that order, so an
/// unordered source is tolerated.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use yatra_core::{Category, DestinationRecord, PlaceType, RecordSource, SourceError};
///
/// struct Fixed(Vec<DestinationRecord>);
///
/// #[async_trait]
/// impl RecordSource for Fixed {
///     async fn fetch_active(&self) -> Result<Vec<DestinationRecord>, SourceError> {
///         Ok(self.0.clone())
///     }
/// }
///
/// let source = Fixed(vec![DestinationRecord::new(
///     "a",
///     "Rumtek Monastery",
///     Category::Monastery,
///     PlaceType::Monastery,
/// )]);
/// # let _ = source;
/// ```
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every active record.
    async fn fetch_active(&self) -> Result<Vec<DestinationRecord>, SourceError>;
}

/// Remote store of per-user favorites.
#[async_trait]
pub trait FavoriteSource: Send + Sync {
    /// List the record ids `user` has favorited.
    async fn list(&self, user: &UserId) -> Result<Vec<RecordId>, SourceError>;

    /// Persist a new favorite.
    async fn insert(&self, user: &UserId, record: &RecordId) -> Result<(), SourceError>;

    /// Remove a favorite.
    async fn delete(&self, user: &UserId, record: &RecordId) -> Result<(), SourceError>;
}

#[async_trait]
impl<T> RecordSource for Arc<T>
where
    T: RecordSource + ?Sized,
{
    async fn fetch_active(&self) -> Result<Vec<DestinationRecord>, SourceError> {
        (**self).fetch_active().await
    }
}

#[async_trait]
impl<T> FavoriteSource for Arc<T>
where
    T: FavoriteSource + ?Sized,
{
    async fn list(&self, user: &UserId) -> Result<Vec<RecordId>, SourceError> {
        (**self).list(user).await
    }

    async fn insert(&self, user: &UserId, record: &RecordId) -> Result<(), SourceError> {
        (**self).insert(user, record).await
    }

    async fn delete(&self, user: &UserId, record: &RecordId) -> Result<(), SourceError> {
        (**self).delete(user, record).await
    }
}
