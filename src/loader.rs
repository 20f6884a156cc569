//! Template loading entry points.
//!
//! Resolves a template reference into at most one round-trip sequence: a
//! primary fetch, plus a single retry without the project id when the
//! project segment turns out not to be a real project.

use crate::auth::{self, CredentialProvider};
use crate::client::Client;
use crate::path::{self, TemplateRef};
use crate::template::{DocumentSummary, RemoteDocument, Template};
use crate::{Error, Result};

/// Result of resolving a template reference.
#[derive(Debug, Clone)]
pub enum Loaded {
    /// A single document, converted to the host template shape.
    Template(Template),
    /// The documents available in a version.
    Listing(Vec<DocumentSummary>),
}

/// Loads templates from Latitude on behalf of the host tool.
#[derive(Debug, Clone)]
pub struct Loader {
    client: Client,
}

impl Loader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a loader with the API key from `LATITUDE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Client::new(auth::api_key_from_env()?)?))
    }

    /// Build a loader with credentials from a provider chain.
    pub async fn from_provider(provider: &dyn CredentialProvider) -> Result<Self> {
        Ok(Self::new(Client::new(provider.resolve().await?)?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resolve a reference into a template or a document listing.
    pub async fn load(&self, reference: &str) -> Result<Loaded> {
        match TemplateRef::parse(reference)? {
            TemplateRef::Listing { project, version } => {
                let documents = self
                    .client
                    .list_documents(project.as_deref(), &version)
                    .await?;
                Ok(Loaded::Listing(documents))
            }
            document_ref => Ok(Loaded::Template(
                self.load_document(reference, document_ref).await?,
            )),
        }
    }

    /// Resolve a reference that must denote a single document.
    ///
    /// Listing references are rejected before any network I/O.
    pub async fn load_template(&self, reference: &str) -> Result<Template> {
        match TemplateRef::parse(reference)? {
            TemplateRef::Listing { .. } => Err(Error::Parse(format!(
                "'{reference}' lists documents; add a document path to load a template"
            ))),
            document_ref => self.load_document(reference, document_ref).await,
        }
    }

    async fn load_document(&self, reference: &str, parsed: TemplateRef) -> Result<Template> {
        let fallback = parsed.project().is_some() && !parsed.has_numeric_project();
        let TemplateRef::Document {
            project,
            version,
            path,
        } = parsed
        else {
            return Err(Error::Parse(format!(
                "'{reference}' does not name a document"
            )));
        };

        let document = self
            .fetch_document(project.as_deref(), version.as_deref(), &path, fallback)
            .await?;
        document.into_template(path::strip_scheme(reference))
    }

    /// Fetch with the single project-omission fallback.
    ///
    /// Latitude project ids are numeric. When a non-numeric segment landed in
    /// the project position and the fetch comes back 404, the segment most
    /// likely belongs to the document path or to no project at all, so one
    /// retry without the project id is attempted. The retry's outcome is
    /// surfaced as-is.
    async fn fetch_document(
        &self,
        project: Option<&str>,
        version: Option<&str>,
        path: &str,
        fallback: bool,
    ) -> Result<RemoteDocument> {
        match self.client.get_document(project, version, path).await {
            Ok(document) => Ok(document),
            Err(e) if fallback && e.is_not_found() => {
                tracing::warn!(
                    project = project.unwrap_or_default(),
                    path,
                    "document not found under ambiguous project id, retrying without it"
                );
                self.client.get_document(None, version, path).await
            }
            Err(e) => Err(e),
        }
    }
}
