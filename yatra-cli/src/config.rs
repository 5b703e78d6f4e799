//! Layered configuration for the catalog subcommands.
//!
//! Every subcommand shares the connection settings. Values come from CLI
//! flags, `YATRA_CMDS_<COMMAND>_<FIELD>` environment variables or the
//! `[cmds.<command>]` table of a config file, merged by `ortho_config`.

use std::time::Duration;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use yatra_core::{FACET_OPTIONS, FacetSelection, RecordId, UserId, facet_option};
use yatra_data::rest::DEFAULT_TIMEOUT_SECS;

use crate::CliError;

pub(crate) const ARG_BASE_URL: &str = "base-url";
pub(crate) const ARG_API_KEY: &str = "api-key";
pub(crate) const ARG_ACCESS_TOKEN: &str = "access-token";
pub(crate) const ARG_USER_ID: &str = "user-id";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_RECORD_ID: &str = "record-id";

/// Declare a subcommand argument struct carrying the shared connection
/// settings followed by the command's own fields.
macro_rules! catalog_args {
    (
        $(#[$meta:meta])*
        $name:ident { command: $command:literal, env: $env:literal }
        $( $(#[$field_meta:meta])* $field:ident: $ty:ty, )*
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
        #[command(name = $command)]
        #[ortho_config(prefix = "YATRA")]
        pub(crate) struct $name {
            /// Project URL of the catalog service.
            #[arg(long = ARG_BASE_URL, value_name = "url")]
            #[serde(default)]
            pub(crate) base_url: Option<String>,
            /// Public API key of the catalog service.
            #[arg(long = ARG_API_KEY, value_name = "key")]
            #[serde(default)]
            pub(crate) api_key: Option<String>,
            /// Access token of the signed-in user.
            #[arg(long = ARG_ACCESS_TOKEN, value_name = "token")]
            #[serde(default)]
            pub(crate) access_token: Option<String>,
            /// Identifier of the signed-in user.
            #[arg(long = ARG_USER_ID, value_name = "id")]
            #[serde(default)]
            pub(crate) user_id: Option<String>,
            /// Request timeout in seconds.
            #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
            #[serde(default)]
            pub(crate) timeout_secs: Option<u64>,
            $( $(#[$field_meta])* pub(crate) $field: $ty, )*
        }

        impl $name {
            pub(crate) const ENV_BASE_URL: &'static str =
                concat!("YATRA_CMDS_", $env, "_BASE_URL");
            pub(crate) const ENV_API_KEY: &'static str = concat!("YATRA_CMDS_", $env, "_API_KEY");

            /// Merge config files and environment, then validate.
            pub(crate) fn into_config<C>(self) -> Result<C, CliError>
            where
                C: TryFrom<Self, Error = CliError>,
            {
                let merged = self.load_and_merge().map_err(CliError::Configuration)?;
                C::try_from(merged)
            }

            fn connection(&self) -> Result<Connection, CliError> {
                let base_url = require(self.base_url.clone(), ARG_BASE_URL, Self::ENV_BASE_URL)?;
                let api_key = require(self.api_key.clone(), ARG_API_KEY, Self::ENV_API_KEY)?;
                let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
                if timeout_secs == 0 {
                    return Err(CliError::ZeroTimeout);
                }
                Ok(Connection {
                    base_url,
                    api_key,
                    access_token: self.access_token.clone(),
                    user: self.user_id.clone().map(UserId::new),
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
        }
    };
}

fn require<T>(value: Option<T>, field: &'static str, env: &'static str) -> Result<T, CliError> {
    value.ok_or(CliError::MissingArgument { field, env })
}

catalog_args! {
    /// CLI arguments for the `search` subcommand.
    SearchArgs { command: "search", env: "SEARCH" }
    /// Free text matched against names, descriptions, addresses and features.
    #[arg(long, short = 'q', value_name = "text")]
    #[serde(default)]
    query: Option<String>,
    /// Facet tag to narrow by; repeat for several.
    #[arg(long = "facet", value_name = "tag")]
    #[serde(default)]
    facets: Vec<String>,
}

catalog_args! {
    /// CLI arguments for the `favorites` subcommand.
    FavoritesArgs { command: "favorites", env: "FAVORITES" }
}

catalog_args! {
    /// CLI arguments for the `toggle` subcommand.
    ToggleArgs { command: "toggle", env: "TOGGLE" }
    /// Identifier of the destination to toggle.
    #[arg(value_name = "id")]
    #[serde(default)]
    record_id: Option<String>,
}

impl FavoritesArgs {
    pub(crate) const ENV_USER_ID: &'static str = "YATRA_CMDS_FAVORITES_USER_ID";
}

impl ToggleArgs {
    pub(crate) const ENV_USER_ID: &'static str = "YATRA_CMDS_TOGGLE_USER_ID";
    pub(crate) const ENV_RECORD_ID: &'static str = "YATRA_CMDS_TOGGLE_RECORD_ID";
}

/// Resolved connection settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Connection {
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) access_token: Option<String>,
    pub(crate) user: Option<UserId>,
    pub(crate) timeout: Duration,
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    pub(crate) connection: Connection,
    pub(crate) query: String,
    pub(crate) facets: FacetSelection,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let connection = args.connection()?;
        let facets = known_facets(&args.facets)?;
        Ok(Self {
            connection,
            query: args.query.unwrap_or_default(),
            facets,
        })
    }
}

fn known_facets(tags: &[String]) -> Result<FacetSelection, CliError> {
    if let Some(unknown) = tags
        .iter()
        .find(|tag| facet_option(&tag.trim().to_lowercase()).is_none())
    {
        let expected = FACET_OPTIONS
            .iter()
            .map(|option| option.id)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CliError::UnknownFacet {
            tag: unknown.clone(),
            expected,
        });
    }
    Ok(FacetSelection::from_tags(tags))
}

/// Resolved `favorites` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FavoritesConfig {
    pub(crate) connection: Connection,
    pub(crate) user: UserId,
}

impl TryFrom<FavoritesArgs> for FavoritesConfig {
    type Error = CliError;

    fn try_from(args: FavoritesArgs) -> Result<Self, Self::Error> {
        let connection = args.connection()?;
        let user = require(
            connection.user.clone(),
            ARG_USER_ID,
            FavoritesArgs::ENV_USER_ID,
        )?;
        Ok(Self { connection, user })
    }
}

/// Resolved `toggle` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ToggleConfig {
    pub(crate) connection: Connection,
    pub(crate) user: UserId,
    pub(crate) record_id: RecordId,
}

impl TryFrom<ToggleArgs> for ToggleConfig {
    type Error = CliError;

    fn try_from(args: ToggleArgs) -> Result<Self, Self::Error> {
        let connection = args.connection()?;
        let user = require(connection.user.clone(), ARG_USER_ID, ToggleArgs::ENV_USER_ID)?;
        let record_id = require(args.record_id, ARG_RECORD_ID, ToggleArgs::ENV_RECORD_ID)?;
        Ok(Self {
            connection,
            user,
            record_id: RecordId::new(record_id),
        })
    }
}
