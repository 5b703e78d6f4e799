//! PostgREST client implementing the record and favorite sources.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response};
use thiserror::Error;
use url::Url;
use yatra_core::{DestinationRecord, FavoriteSource, RecordId, RecordSource, SourceError, UserId};

use super::config::RestClientConfig;
use super::rows::{NewFavorite, decode_favorites, decode_records};

const PLACES: &str = "places";
const FAVORITES: &str = "favorites";

/// Error returned when a [`RestCatalogClient`] cannot be constructed.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// Offending value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Catalog and favorites access over a PostgREST API.
///
/// # Example
///
/// ```no_run
/// use yatra_core::RecordSource;
/// use yatra_data::rest::{RestCatalogClient, RestClientConfig};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RestCatalogClient::with_config(
///     RestClientConfig::new("https://abc.supabase.co", "anon-key"),
/// )?;
/// let records = client.fetch_active().await?;
/// println!("{} destinations", records.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RestCatalogClient {
    client: Client,
    config: RestClientConfig,
    root: Url,
}

impl RestCatalogClient {
    /// Create a client with default settings.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ClientBuildError> {
        Self::with_config(RestClientConfig::new(base_url, api_key))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: RestClientConfig) -> Result<Self, ClientBuildError> {
        let root = rest_root(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            root,
        })
    }

    /// Settings this client was built with.
    pub const fn config(&self) -> &RestClientConfig {
        &self.config
    }

    fn endpoint(&self, table: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.root.clone();
        url.set_path(&format!("{}{table}", self.root.path()));
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        url
    }

    /// `GET` URL for the active catalog, featured first then by rating.
    pub fn places_url(&self) -> Url {
        self.endpoint(
            PLACES,
            &[
                ("select", "*"),
                ("is_active", "eq.true"),
                ("order", "is_featured.desc,rating.desc"),
            ],
        )
    }

    /// `GET` URL listing `user`'s favorite record ids.
    pub fn favorites_url(&self, user: &UserId) -> Url {
        let user_filter = format!("eq.{user}");
        self.endpoint(
            FAVORITES,
            &[("select", "place_id"), ("user_id", user_filter.as_str())],
        )
    }

    /// `POST` URL for new favorites.
    pub fn favorite_insert_url(&self) -> Url {
        self.endpoint(FAVORITES, &[])
    }

    /// `DELETE` URL removing one favorite.
    pub fn favorite_delete_url(&self, user: &UserId, record: &RecordId) -> Url {
        let user_filter = format!("eq.{user}");
        let place_filter = format!("eq.{record}");
        self.endpoint(
            FAVORITES,
            &[
                ("user_id", user_filter.as_str()),
                ("place_id", place_filter.as_str()),
            ],
        )
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(self.config.bearer_token())
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, SourceError> {
        request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))
    }

    async fn fetch_body(&self, url: Url) -> Result<String, SourceError> {
        debug!("GET {url}");
        let request = self.request(Method::GET, url.clone());
        self.send(request, &url)
            .await?
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))
    }

    /// Convert a reqwest error into a [`SourceError`].
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> SourceError {
        if error.is_timeout() {
            return SourceError::Timeout {
                url: url.to_string(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return SourceError::Http {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return SourceError::Decode {
                message: error.to_string(),
            };
        }

        SourceError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

fn rest_root(base_url: &str) -> Result<Url, ClientBuildError> {
    let invalid = |reason: &str| ClientBuildError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: reason.to_owned(),
    };
    let mut root = Url::parse(base_url).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(root.scheme(), "http" | "https") || root.cannot_be_a_base() {
        return Err(invalid("expected an http or https URL"));
    }
    let path = format!("{}/rest/v1/", root.path().trim_end_matches('/'));
    root.set_path(&path);
    root.set_query(None);
    root.set_fragment(None);
    Ok(root)
}

#[async_trait]
impl RecordSource for RestCatalogClient {
    async fn fetch_active(&self) -> Result<Vec<DestinationRecord>, SourceError> {
        let body = self.fetch_body(self.places_url()).await?;
        decode_records(&body)
    }
}

#[async_trait]
impl FavoriteSource for RestCatalogClient {
    async fn list(&self, user: &UserId) -> Result<Vec<RecordId>, SourceError> {
        let body = self.fetch_body(self.favorites_url(user)).await?;
        decode_favorites(&body)
    }

    async fn insert(&self, user: &UserId, record: &RecordId) -> Result<(), SourceError> {
        let url = self.favorite_insert_url();
        debug!("POST {url} for {record}");
        let request = self
            .request(Method::POST, url.clone())
            .header("Prefer", "return=minimal")
            .json(&NewFavorite {
                user_id: user,
                place_id: record,
            });
        self.send(request, &url).await?;
        Ok(())
    }

    async fn delete(&self, user: &UserId, record: &RecordId) -> Result<(), SourceError> {
        let url = self.favorite_delete_url(user, record);
        debug!("DELETE {url}");
        let request = self.request(Method::DELETE, url.clone());
        self.send(request, &url).await?;
        Ok(())
    }
}
