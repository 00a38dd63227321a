use std::error::Error;

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::core::builtin_providers::default_model_for;
use crate::core::config::Config;

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Everything dispatch needs to know about the provider for one call.
///
/// Built fresh for every request; the core never updates it in place.
#[derive(Debug)]
pub struct ProviderConfig {
    pub provider: String,
    pub model: String,
    credential: SecretString,
    pub temperature: f64,
    /// Operator-supplied endpoint, required by the `custom` provider.
    pub endpoint: Option<String>,
}

impl ProviderConfig {
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            credential: SecretString::from(credential.into()),
            temperature: DEFAULT_TEMPERATURE,
            endpoint: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn credential(&self) -> &SecretString {
        &self.credential
    }

    pub fn has_credential(&self) -> bool {
        !self.credential.expose_secret().is_empty()
    }
}

/// Somewhere API keys can be looked up by provider id.
pub trait CredentialSource {
    fn credential_for(&self, provider: &str) -> Result<Option<String>, Box<dyn Error>>;
}

/// Values given on the command line, which win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ProviderOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub endpoint: Option<String>,
}

/// Build the provider configuration for the next request.
///
/// Provider, model, temperature and endpoint each come from the overrides,
/// then the config file, then the built-in defaults. A credential that cannot
/// be read is treated as missing so that dispatch reports it uniformly.
pub fn resolve_provider_config<S: CredentialSource>(
    source: &S,
    config: &Config,
    overrides: &ProviderOverrides,
) -> ProviderConfig {
    let provider = overrides
        .provider
        .as_deref()
        .filter(|value| !value.is_empty())
        .or(config.default_provider.as_deref())
        .unwrap_or(DEFAULT_PROVIDER)
        .to_ascii_lowercase();

    let model = overrides
        .model
        .clone()
        .filter(|value| !value.is_empty())
        .or_else(|| config.get_default_model(&provider).cloned())
        .or_else(|| default_model_for(&provider))
        .unwrap_or_default();

    let credential = match source.credential_for(&provider) {
        Ok(found) => found.unwrap_or_default(),
        Err(err) => {
            warn!(provider = %provider, error = %err, "Could not read stored credential");
            String::new()
        }
    };

    let mut resolved = ProviderConfig::new(provider, model, credential).with_temperature(
        overrides
            .temperature
            .or(config.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE),
    );
    resolved.endpoint = overrides
        .endpoint
        .clone()
        .or_else(|| config.custom_endpoint.clone());
    resolved
}
