//! Latitude API client.
//!
//! A thin authenticated wrapper over the document-fetch and document-list
//! endpoints. The client performs exactly one round-trip per call; the
//! project-omission fallback lives in the loader.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::template::{DocumentSummary, RemoteDocument};
use crate::{Error, Result};

/// Latitude gateway, API v3.
pub const DEFAULT_BASE_URL: &str = "https://gateway.latitude.so/api/v3";

/// Version alias for the latest published snapshot.
pub const LIVE_VERSION: &str = "live";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Latitude REST API.
///
/// A plain value constructed per invocation; no shared mutable state. Tests
/// inject their own transport via [`ClientBuilder::http`].
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Client {
    pub fn new(api_key: SecretString) -> Result<Self> {
        ClientBuilder {
            api_key: Some(api_key),
            ..ClientBuilder::default()
        }
        .build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a single document.
    ///
    /// A missing version targets the live snapshot. 401/403 map to
    /// [`Error::Auth`], 404 to [`Error::NotFound`], other non-2xx to
    /// [`Error::Api`] with the response body as the message.
    pub async fn get_document(
        &self,
        project: Option<&str>,
        version: Option<&str>,
        path: &str,
    ) -> Result<RemoteDocument> {
        let url = format!(
            "{}/documents/{}",
            self.version_url(project, version.unwrap_or(LIVE_VERSION)),
            encode_document_path(path),
        );
        let body = self
            .get(&url, || format!("document not found: {path}"))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// List all documents in a version.
    pub async fn list_documents(
        &self,
        project: Option<&str>,
        version: &str,
    ) -> Result<Vec<DocumentSummary>> {
        let url = format!("{}/documents", self.version_url(project, version));
        let body = self
            .get(&url, || format!("version not found: {version}"))
            .await?;
        let listing: ListingResponse = serde_json::from_str(&body)?;
        Ok(listing.into_documents())
    }

    fn version_url(&self, project: Option<&str>, version: &str) -> String {
        match project {
            Some(project) => format!("{}/projects/{project}/versions/{version}", self.base_url),
            None => format!("{}/versions/{version}", self.base_url),
        }
    }

    async fn get(&self, url: &str, not_found: impl Fn() -> String) -> Result<String> {
        tracing::debug!(%url, "fetching from Latitude");

        let response = self
            .http
            .get(url)
            .bearer_auth(self.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        match status {
            401 | 403 => Err(Error::auth("Invalid Latitude API key")),
            404 => Err(Error::not_found(not_found())),
            _ if !response.status().is_success() => {
                let message = response.text().await.unwrap_or_default();
                Err(Error::Api { status, message })
            }
            _ => Ok(response.text().await?),
        }
    }
}

/// Listings come back either as a bare array or wrapped in a `documents` key.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingResponse {
    Bare(Vec<DocumentSummary>),
    Wrapped { documents: Vec<DocumentSummary> },
}

impl ListingResponse {
    fn into_documents(self) -> Vec<DocumentSummary> {
        match self {
            ListingResponse::Bare(documents) | ListingResponse::Wrapped { documents } => documents,
        }
    }
}

/// Percent-encode each segment of a document path, keeping `/` separators.
fn encode_document_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<SecretString>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Inject a preconfigured transport, bypassing `timeout`.
    pub fn http(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .ok_or_else(|| Error::auth("no API key configured"))?;

        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                .build()?,
        };

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Client {
            http,
            base_url,
            api_key,
        })
    }
}
