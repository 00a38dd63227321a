//! API key storage.
//!
//! Keys live in the platform keyring under the `chatdock` service, one entry
//! per provider id. When no keyring entry exists the `<PROVIDER>_API_KEY`
//! environment variable is consulted instead.

use keyring::Entry;
use thiserror::Error;
use tracing::debug;

use crate::core::adapters::AdapterRegistry;
use crate::core::builtin_providers::load_builtin_providers;
use crate::core::config::Config;
use crate::core::providers::CredentialSource;

const KEYRING_SERVICE: &str = "chatdock";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("API key cannot be empty")]
    EmptyToken,

    #[error("keyring access is disabled")]
    KeyringDisabled,

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAuthStatus {
    pub id: String,
    pub display_name: String,
    pub requires_key: bool,
    pub has_token: bool,
    pub is_default: bool,
}

pub struct AuthManager {
    use_keyring: bool,
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthManager {
    pub fn new() -> Self {
        Self { use_keyring: true }
    }

    /// Construct an AuthManager that only reads environment variables (useful for tests)
    pub fn without_keyring() -> Self {
        Self { use_keyring: false }
    }

    /// Environment variable consulted for `provider`, e.g. `OPENROUTER_API_KEY`.
    pub fn env_var_name(provider: &str) -> String {
        let stem: String = provider
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{stem}_API_KEY")
    }

    fn known_provider(provider: &str) -> Result<String, AuthError> {
        AdapterRegistry::builtin()
            .find(provider)
            .map(|adapter| adapter.id.to_string())
            .ok_or_else(|| AuthError::UnknownProvider(provider.to_string()))
    }

    pub fn store_token(&self, provider: &str, token: &str) -> Result<(), AuthError> {
        let provider = Self::known_provider(provider)?;
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        if !self.use_keyring {
            return Err(AuthError::KeyringDisabled);
        }
        Entry::new(KEYRING_SERVICE, &provider)?.set_password(token)?;
        Ok(())
    }

    pub fn get_token(&self, provider: &str) -> Result<Option<String>, AuthError> {
        if !self.use_keyring {
            return Ok(None);
        }
        debug!(provider, "Looking up keyring entry");
        match Entry::new(KEYRING_SERVICE, provider)?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns false when there was nothing to remove.
    pub fn remove_token(&self, provider: &str) -> Result<bool, AuthError> {
        let provider = Self::known_provider(provider)?;
        if !self.use_keyring {
            return Err(AuthError::KeyringDisabled);
        }
        match Entry::new(KEYRING_SERVICE, &provider)?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn env_token(provider: &str) -> Option<String> {
        std::env::var(Self::env_var_name(provider))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    /// Every built-in provider with whether a key is available for it.
    pub fn provider_statuses(&self, config: &Config) -> Vec<ProviderAuthStatus> {
        let registry = AdapterRegistry::builtin();
        load_builtin_providers()
            .into_iter()
            .map(|provider| {
                let requires_key = registry
                    .find(&provider.id)
                    .is_some_and(|adapter| adapter.requires_credential);
                let has_token = self
                    .credential_for(&provider.id)
                    .ok()
                    .flatten()
                    .is_some();
                let is_default = config
                    .default_provider
                    .as_deref()
                    .is_some_and(|d| d.eq_ignore_ascii_case(&provider.id));
                ProviderAuthStatus {
                    id: provider.id,
                    display_name: provider.display_name,
                    requires_key,
                    has_token,
                    is_default,
                }
            })
            .collect()
    }
}

impl CredentialSource for AuthManager {
    fn credential_for(
        &self,
        provider: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error>> {
        if let Some(token) = self.get_token(provider)? {
            return Ok(Some(token));
        }
        Ok(Self::env_token(provider))
    }
}
