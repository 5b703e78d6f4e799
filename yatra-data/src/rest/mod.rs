//! Catalog and favorites over a PostgREST (Supabase-style) API.
//!
//! [`RestCatalogClient`] implements both [`yatra_core::RecordSource`] and
//! [`yatra_core::FavoriteSource`]. It reads active destinations from the
//! `places` table and keeps per-user favorites in the `favorites` table,
//! authorising with the project's API key and, when signed in, the user's
//! access token.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use yatra_data::rest::{RestCatalogClient, RestClientConfig};
//!
//! let config = RestClientConfig::new("https://abc.supabase.co", "anon-key")
//!     .with_access_token("user-jwt")
//!     .with_timeout(Duration::from_secs(10));
//! let client = RestCatalogClient::with_config(config)?;
//! # Ok::<(), yatra_data::rest::ClientBuildError>(())
//! ```

mod client;
mod config;
mod rows;

#[doc(hidden)]
pub mod test_support;

pub use client::{ClientBuildError, RestCatalogClient};
pub use config::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, RestClientConfig};
