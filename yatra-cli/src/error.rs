//! Error types emitted by the Yatra CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use thiserror::Error;
use yatra_core::{FetchError, RecordId, ToggleError, UserId};
use yatra_data::rest::ClientBuildError;

/// Errors emitted by the Yatra CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The request timeout must be at least one second.
    #[error("timeout-secs must be positive")]
    ZeroTimeout,
    /// A `--facet` value is not one of the offered facets.
    #[error("unknown facet {tag:?} (expected one of: {expected})")]
    UnknownFacet { tag: String, expected: String },
    /// The record to toggle is not in the active catalog.
    #[error("no active destination with id {id}")]
    UnknownRecord { id: RecordId },
    /// The user's favorites could not be read, so a toggle has no known
    /// starting state.
    #[error("cannot toggle: favorites of {user} could not be read")]
    FavoritesUnavailable { user: UserId },
    /// Building the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Constructing the REST client failed.
    #[error("failed to build catalog client for {base_url:?}: {source}")]
    BuildClient {
        base_url: String,
        #[source]
        source: ClientBuildError,
    },
    /// Loading the catalog failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A favorite toggle did not take effect.
    #[error(transparent)]
    Toggle(#[from] ToggleError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
