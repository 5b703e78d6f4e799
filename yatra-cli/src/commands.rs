//! Execution of the catalog subcommands against a backend.

use std::io::Write;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use yatra_core::{
    Activation, CatalogSession, Category, DestinationRecord, FavoriteSource, FavoriteSync, Notice, PlaceType,
    RecordId, RecordSource, UserId, WatchSessionGate,
};
use yatra_data::rest::{RestCatalogClient, RestClientConfig};

use crate::config::{Connection, FavoritesConfig, SearchConfig, ToggleConfig};
use crate::{CliError, Command};

/// Remote catalog able to serve records and favorites.
pub(crate) trait CatalogBackend: RecordSource + FavoriteSource {}

impl<T> CatalogBackend for T where T: RecordSource + FavoriteSource + ?Sized {}

/// Builds the backend for the current invocation.
pub(crate) trait BackendBuilder {
    fn build(&self, connection: &Connection) -> Result<Arc<dyn CatalogBackend>, CliError>;
}

pub(crate) struct RestBackendBuilder;

impl BackendBuilder for RestBackendBuilder {
    fn build(&self, connection: &Connection) -> Result<Arc<dyn CatalogBackend>, CliError> {
        let mut config = RestClientConfig::new(&connection.base_url, &connection.api_key)
            .with_timeout(connection.timeout);
        if let Some(token) = &connection.access_token {
            config = config.with_access_token(token);
        }
        let client =
            RestCatalogClient::with_config(config).map_err(|source| CliError::BuildClient {
                base_url: connection.base_url.clone(),
                source,
            })?;
        Ok(Arc::new(client))
    }
}

type Backend = Arc<dyn CatalogBackend>;
type Session = CatalogSession<Backend, Backend, WatchSessionGate>;

/// One catalog entry as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RecordSummary {
    pub(crate) id: RecordId,
    pub(crate) name: String,
    pub(crate) category: Category,
    pub(crate) place_type: PlaceType,
    pub(crate) rating: f32,
    pub(crate) is_featured: bool,
    pub(crate) favorite: bool,
}

impl RecordSummary {
    fn of(record: &DestinationRecord, session: &Session) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            category: record.category,
            place_type: record.place_type,
            rating: record.rating,
            is_featured: record.is_featured,
            favorite: session.is_favorited(&record.id),
        }
    }
}

/// Output of `search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SearchOutput {
    pub(crate) total: usize,
    pub(crate) records: Vec<RecordSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) notice: Option<Notice>,
}

/// Output of `favorites`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct FavoritesOutput {
    pub(crate) user: UserId,
    pub(crate) records: Vec<RecordSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) notice: Option<Notice>,
}

/// Output of `toggle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ToggleOutput {
    pub(crate) record_id: RecordId,
    pub(crate) favorite: bool,
    pub(crate) notice: Notice,
}

pub(crate) fn run_command_with(
    command: Command,
    builder: &dyn BackendBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    match command {
        Command::Search(args) => {
            let config: SearchConfig = args.into_config()?;
            let output = runtime.block_on(search(&config, builder))?;
            write_json(writer, &output)
        }
        Command::Favorites(args) => {
            let config: FavoritesConfig = args.into_config()?;
            let output = runtime.block_on(favorites(&config, builder))?;
            write_json(writer, &output)
        }
        Command::Toggle(args) => {
            let config: ToggleConfig = args.into_config()?;
            let output = runtime.block_on(toggle(&config, builder))?;
            write_json(writer, &output)
        }
    }
}

async fn open_session(
    connection: &Connection,
    user: Option<UserId>,
    builder: &dyn BackendBuilder,
) -> Result<(Session, Activation), CliError> {
    let backend = builder.build(connection)?;
    let gate = user.map_or_else(WatchSessionGate::anonymous, WatchSessionGate::signed_in);
    let favorites = Arc::new(FavoriteSync::new(Arc::clone(&backend), gate));
    let mut session = CatalogSession::new(backend, favorites);
    let activation = session.activate().await?;
    debug!(
        "catalog ready with {} records, favorites {:?}",
        activation.records, activation.favorites
    );
    Ok((session, activation))
}

pub(crate) async fn search(
    config: &SearchConfig,
    builder: &dyn BackendBuilder,
) -> Result<SearchOutput, CliError> {
    let (mut session, activation) =
        open_session(&config.connection, config.connection.user.clone(), builder).await?;
    session.set_query(config.query.as_str());
    session.set_facets(config.facets.clone());
    let records: Vec<_> = session
        .filtered_records()
        .into_iter()
        .map(|record| RecordSummary::of(record, &session))
        .collect();
    Ok(SearchOutput {
        total: records.len(),
        records,
        notice: activation.notice,
    })
}

pub(crate) async fn favorites(
    config: &FavoritesConfig,
    builder: &dyn BackendBuilder,
) -> Result<FavoritesOutput, CliError> {
    let (session, activation) =
        open_session(&config.connection, Some(config.user.clone()), builder).await?;
    let records = session
        .favorite_records()
        .into_iter()
        .map(|record| RecordSummary::of(record, &session))
        .collect();
    Ok(FavoritesOutput {
        user: config.user.clone(),
        records,
        notice: activation.notice,
    })
}

pub(crate) async fn toggle(
    config: &ToggleConfig,
    builder: &dyn BackendBuilder,
) -> Result<ToggleOutput, CliError> {
    let (session, activation) =
        open_session(&config.connection, Some(config.user.clone()), builder).await?;
    // The write direction depends on the current membership.
    if activation.favorites.is_none() {
        return Err(CliError::FavoritesUnavailable {
            user: config.user.clone(),
        });
    }
    if session.record(config.record_id.as_str()).is_none() {
        return Err(CliError::UnknownRecord {
            id: config.record_id.clone(),
        });
    }
    let outcome = session.favorite_sync().toggle(&config.record_id).await;
    let notice = Notice::for_toggle(&outcome);
    outcome?;
    Ok(ToggleOutput {
        record_id: config.record_id.clone(),
        favorite: session.is_favorited(&config.record_id),
        notice,
    })
}

fn write_json<T: Serialize>(writer: &mut dyn Write, output: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(output).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
