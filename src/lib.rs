//! # llm-templates-latitude
//!
//! Load prompts from the [Latitude](https://latitude.so) prompt-management
//! platform as templates for command-line LLM tools.
//!
//! A template reference is 1–3 slash-separated segments, optionally prefixed
//! with the `lat:` scheme:
//!
//! - `project_id/version_uuid/document_path` — full document lookup
//! - `version_uuid/document_path` — document lookup without a project id
//! - `project_id/version_uuid` — list all documents in a version
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use llm_templates_latitude::load_template;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), llm_templates_latitude::Error> {
//!     let template =
//!         load_template("lat:19228/dc951f3b-a3d9-4ede-bff1-821e7b10c5e8/welcome-email").await?;
//!     println!("{}", template.prompt);
//!     Ok(())
//! }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod client;
pub mod loader;
pub mod path;
pub mod template;

pub use auth::{ChainProvider, CredentialProvider, EnvironmentProvider, ExplicitProvider};
pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL, LIVE_VERSION};
pub use loader::{Loaded, Loader};
pub use path::{TemplateRef, is_uuid_like};
pub use template::{DocumentSummary, RemoteDocument, Template};

/// Error type for template loading operations.
///
/// Every failure propagates to the host tool as a loader error with a
/// human-readable message; nothing is swallowed or retried automatically.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// API key is missing or rejected (HTTP 401/403).
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Document, version, or project does not exist (HTTP 404).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// API returned an unexpected error response.
    #[error("Latitude API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Network connectivity or request failed (including timeouts).
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Template reference is malformed.
    #[error("Invalid template reference: {0}")]
    Parse(String),

    /// API response is missing required fields.
    #[error("Invalid document: {0}")]
    Validation(String),
}

impl Error {
    pub fn auth(message: impl Into<String>) -> Self {
        Error::Auth {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Error::Auth { .. }
                | Error::Api {
                    status: 401 | 403,
                    ..
                }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Server-side and transport failures may succeed on a later invocation;
    /// the crate itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Network(_)
                | Error::Api {
                    status: 500..=599,
                    ..
                }
        )
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Auth { .. } => Some(401),
            Error::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Load a single template with credentials resolved from the environment.
///
/// Rejects listing references; use [`Loader::load`] for those.
pub async fn load_template(reference: &str) -> Result<Template> {
    Loader::from_env()?.load_template(reference).await
}

/// Resolve a template reference against the Latitude API.
///
/// Returns either a single [`Template`] or a [`Loaded::Listing`] of the
/// documents in a version.
pub async fn load(reference: &str) -> Result<Loaded> {
    Loader::from_env()?.load(reference).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Api {
            status: 500,
            message: "internal error".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("internal error"));
    }

    #[test]
    fn test_error_categories() {
        assert!(Error::auth("bad key").is_auth());
        assert!(
            Error::Api {
                status: 403,
                message: String::new()
            }
            .is_auth()
        );
        assert!(Error::not_found("missing").is_not_found());
        assert!(!Error::not_found("missing").is_auth());

        let server_error = Error::Api {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert!(server_error.is_retryable());
        assert!(!Error::auth("bad key").is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::auth("x").status_code(), Some(401));
        assert_eq!(Error::not_found("x").status_code(), Some(404));
        assert_eq!(Error::Parse("x".into()).status_code(), None);
    }
}
