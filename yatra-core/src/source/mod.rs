//! Remote collaborators consumed by the engine.
//!
//! [`RecordSource`] supplies the catalog and [`FavoriteSource`] persists
//! per-user favorites. Both report failures as [`SourceError`]; the engine
//! wraps those into its own [`FetchError`](crate::FetchError) and
//! [`ToggleError`](crate::ToggleError).

mod error;
mod provider;

pub use error::SourceError;
pub use provider::{FavoriteSource, RecordSource};
