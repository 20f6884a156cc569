//! API-key resolution.
//!
//! The host tool may have its own credential store; it plugs in here by
//! implementing [`CredentialProvider`] and chaining it after the environment
//! provider.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::{Error, Result};

const DEFAULT_ENV_VAR: &str = "LATITUDE_API_KEY";

/// Source of a Latitude API key.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn resolve(&self) -> Result<SecretString>;
}

/// Provider that reads the API key from an environment variable.
pub struct EnvironmentProvider {
    env_var: String,
}

impl EnvironmentProvider {
    /// Create provider using the default `LATITUDE_API_KEY`.
    pub fn new() -> Self {
        Self {
            env_var: DEFAULT_ENV_VAR.to_string(),
        }
    }

    /// Create provider with a custom environment variable.
    pub fn from_var(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
        }
    }
}

impl Default for EnvironmentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for EnvironmentProvider {
    fn name(&self) -> &str {
        "environment"
    }

    async fn resolve(&self) -> Result<SecretString> {
        std::env::var(&self.env_var)
            .ok()
            .filter(|key| !key.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| Error::auth(format!("{} not set", self.env_var)))
    }
}

/// Provider wrapping an explicitly supplied key.
pub struct ExplicitProvider {
    key: SecretString,
}

impl ExplicitProvider {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: SecretString::from(key.into()),
        }
    }
}

#[async_trait]
impl CredentialProvider for ExplicitProvider {
    fn name(&self) -> &str {
        "explicit"
    }

    async fn resolve(&self) -> Result<SecretString> {
        Ok(self.key.clone())
    }
}

/// Tries providers in order, returning the first key found.
pub struct ChainProvider {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ChainProvider {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl Default for ChainProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for ChainProvider {
    fn name(&self) -> &str {
        "chain"
    }

    async fn resolve(&self) -> Result<SecretString> {
        for provider in &self.providers {
            match provider.resolve().await {
                Ok(key) => return Ok(key),
                Err(e) => {
                    tracing::debug!(provider = provider.name(), error = %e, "provider had no key");
                }
            }
        }
        Err(Error::auth(
            "Latitude API key not found. Set LATITUDE_API_KEY or configure \
             the host tool's key store",
        ))
    }
}

/// Resolve an API key from the environment.
pub fn api_key_from_env() -> Result<SecretString> {
    std::env::var(DEFAULT_ENV_VAR)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| {
            Error::auth(format!(
                "Latitude API key not found. Set the {DEFAULT_ENV_VAR} environment variable"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[tokio::test]
    async fn test_environment_provider_missing() {
        // SAFETY: Test-only environment setup, single-threaded test context
        unsafe { std::env::remove_var("LAT_TEST_KEY_NOT_SET") };
        let provider = EnvironmentProvider::from_var("LAT_TEST_KEY_NOT_SET");
        let err = provider.resolve().await.unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_environment_provider_set() {
        // SAFETY: Test-only environment setup, single-threaded test context
        unsafe { std::env::set_var("LAT_TEST_KEY_SET", "test-key") };
        let provider = EnvironmentProvider::from_var("LAT_TEST_KEY_SET");
        let key = provider.resolve().await.unwrap();
        assert_eq!(key.expose_secret(), "test-key");
        unsafe { std::env::remove_var("LAT_TEST_KEY_SET") };
    }

    #[tokio::test]
    async fn test_explicit_provider() {
        let provider = ExplicitProvider::new("sk-lat-explicit");
        let key = provider.resolve().await.unwrap();
        assert_eq!(key.expose_secret(), "sk-lat-explicit");
    }

    #[tokio::test]
    async fn test_chain_falls_through_to_next_provider() {
        let chain = ChainProvider::new()
            .with(EnvironmentProvider::from_var("LAT_TEST_KEY_CHAIN_UNSET"))
            .with(ExplicitProvider::new("fallback-key"));
        let key = chain.resolve().await.unwrap();
        assert_eq!(key.expose_secret(), "fallback-key");
    }

    #[tokio::test]
    async fn test_empty_chain_is_auth_error() {
        let err = ChainProvider::new().resolve().await.unwrap_err();
        assert!(err.is_auth());
        assert!(err.to_string().contains("LATITUDE_API_KEY"));
    }
}
