//! Provider adapter registry
//!
//! Each supported provider is described by a [`ProviderAdapter`]: a record of
//! four pure rules that translate the shared chat payload into the provider's
//! wire format and pull the reply text back out of its response. Dispatch only
//! ever talks to the registry, so adding a provider means registering one more
//! record.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::api::ChatRequest;
use crate::core::dispatch::DispatchError;
use crate::core::providers::ProviderConfig;

/// Reply text used when a successful response lacks the expected field.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response received";

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
pub const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const OLLAMA_CHAT_URL: &str = "http://localhost:11434/api/chat";

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_MAX_TOKENS: u32 = 1000;

pub const OPENROUTER_REFERER: &str = "http://localhost";
pub const OPENROUTER_TITLE: &str = "AI Chat Sidebar";

pub type EndpointRule = fn(&ProviderConfig) -> Result<String, DispatchError>;
pub type HeaderRule = fn(&ProviderConfig) -> Result<HeaderMap, DispatchError>;
pub type BodyRule = fn(&mut ChatRequest);
pub type ExtractRule = fn(&Value) -> Option<String>;

#[derive(Clone, Copy)]
pub struct ProviderAdapter {
    pub id: &'static str,
    /// Whether dispatch must refuse an empty credential.
    pub requires_credential: bool,
    /// Whether the endpoint rule reads the provider config. Such adapters
    /// ignore registry endpoint overrides.
    pub endpoint_from_config: bool,
    pub endpoint: EndpointRule,
    pub headers: HeaderRule,
    pub body: BodyRule,
    pub extract: ExtractRule,
}

impl ProviderAdapter {
    /// Run the extraction rule, degrading to the placeholder text.
    pub fn extract_reply(&self, body: &Value) -> String {
        (self.extract)(body).unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string())
    }
}

impl std::fmt::Debug for ProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderAdapter")
            .field("id", &self.id)
            .field("requires_credential", &self.requires_credential)
            .field("endpoint_from_config", &self.endpoint_from_config)
            .finish_non_exhaustive()
    }
}

pub const OPENAI: ProviderAdapter = ProviderAdapter {
    id: "openai",
    requires_credential: true,
    endpoint_from_config: false,
    endpoint: openai_endpoint,
    headers: bearer_headers,
    body: unchanged_body,
    extract: extract_chat_completion,
};

pub const ANTHROPIC: ProviderAdapter = ProviderAdapter {
    id: "anthropic",
    requires_credential: true,
    endpoint_from_config: false,
    endpoint: anthropic_endpoint,
    headers: anthropic_headers,
    body: anthropic_body,
    extract: extract_anthropic,
};

pub const OPENROUTER: ProviderAdapter = ProviderAdapter {
    id: "openrouter",
    requires_credential: true,
    endpoint_from_config: false,
    endpoint: openrouter_endpoint,
    headers: openrouter_headers,
    body: unchanged_body,
    extract: extract_chat_completion,
};

pub const OLLAMA: ProviderAdapter = ProviderAdapter {
    id: "ollama",
    requires_credential: false,
    endpoint_from_config: false,
    endpoint: ollama_endpoint,
    headers: unauthenticated_headers,
    body: ollama_body,
    extract: extract_ollama,
};

pub const CUSTOM: ProviderAdapter = ProviderAdapter {
    id: "custom",
    requires_credential: true,
    endpoint_from_config: true,
    endpoint: custom_endpoint,
    headers: bearer_headers,
    body: unchanged_body,
    extract: extract_custom,
};

/// Lookup table from provider id to adapter.
#[derive(Debug, Clone)]
pub struct AdapterRegistry {
    adapters: Vec<ProviderAdapter>,
    endpoint_overrides: HashMap<String, String>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AdapterRegistry {
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
            endpoint_overrides: HashMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for adapter in [OPENAI, ANTHROPIC, OPENROUTER, OLLAMA, CUSTOM] {
            registry.register(adapter);
        }
        registry
    }

    /// Add an adapter, replacing any adapter already registered under the same id.
    pub fn register(&mut self, adapter: ProviderAdapter) {
        self.adapters
            .retain(|existing| !existing.id.eq_ignore_ascii_case(adapter.id));
        self.adapters.push(adapter);
    }

    /// Send requests for `id` to `url` instead of the adapter's own endpoint.
    pub fn with_endpoint_override(mut self, id: &str, url: impl Into<String>) -> Self {
        self.endpoint_overrides
            .insert(id.to_ascii_lowercase(), url.into());
        self
    }

    /// Find an adapter by provider id (case-insensitive)
    pub fn find(&self, id: &str) -> Option<&ProviderAdapter> {
        self.adapters
            .iter()
            .find(|adapter| adapter.id.eq_ignore_ascii_case(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.adapters.iter().map(|adapter| adapter.id)
    }

    pub fn endpoint_for(
        &self,
        adapter: &ProviderAdapter,
        config: &ProviderConfig,
    ) -> Result<String, DispatchError> {
        match self.endpoint_overrides.get(adapter.id) {
            Some(url) if !adapter.endpoint_from_config => parse_endpoint(url),
            _ => (adapter.endpoint)(config),
        }
    }
}

fn parse_endpoint(url: &str) -> Result<String, DispatchError> {
    reqwest::Url::parse(url)
        .map(|_| url.to_string())
        .map_err(|_| DispatchError::InvalidEndpoint(url.to_string()))
}

fn openai_endpoint(_: &ProviderConfig) -> Result<String, DispatchError> {
    Ok(OPENAI_CHAT_URL.to_string())
}

fn anthropic_endpoint(_: &ProviderConfig) -> Result<String, DispatchError> {
    Ok(ANTHROPIC_MESSAGES_URL.to_string())
}

fn openrouter_endpoint(_: &ProviderConfig) -> Result<String, DispatchError> {
    Ok(OPENROUTER_CHAT_URL.to_string())
}

fn ollama_endpoint(_: &ProviderConfig) -> Result<String, DispatchError> {
    Ok(OLLAMA_CHAT_URL.to_string())
}

fn custom_endpoint(config: &ProviderConfig) -> Result<String, DispatchError> {
    let endpoint = config
        .endpoint
        .as_deref()
        .map(str::trim)
        .filter(|endpoint| !endpoint.is_empty())
        .ok_or(DispatchError::MissingEndpoint)?;
    parse_endpoint(endpoint)
}

fn unauthenticated_headers(_: &ProviderConfig) -> Result<HeaderMap, DispatchError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn secret_header(config: &ProviderConfig, value: String) -> Result<HeaderValue, DispatchError> {
    let mut value = HeaderValue::from_str(&value)
        .map_err(|_| DispatchError::InvalidCredential(config.provider.clone()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn bearer_headers(config: &ProviderConfig) -> Result<HeaderMap, DispatchError> {
    let mut headers = unauthenticated_headers(config)?;
    let token = format!("Bearer {}", config.credential().expose_secret());
    headers.insert(AUTHORIZATION, secret_header(config, token)?);
    Ok(headers)
}

fn anthropic_headers(config: &ProviderConfig) -> Result<HeaderMap, DispatchError> {
    let mut headers = unauthenticated_headers(config)?;
    let key = config.credential().expose_secret().to_string();
    headers.insert(
        HeaderName::from_static("x-api-key"),
        secret_header(config, key)?,
    );
    headers.insert(
        HeaderName::from_static("anthropic-version"),
        HeaderValue::from_static(ANTHROPIC_VERSION),
    );
    Ok(headers)
}

fn openrouter_headers(config: &ProviderConfig) -> Result<HeaderMap, DispatchError> {
    let mut headers = bearer_headers(config)?;
    headers.insert(
        HeaderName::from_static("http-referer"),
        HeaderValue::from_static(OPENROUTER_REFERER),
    );
    headers.insert(
        HeaderName::from_static("x-title"),
        HeaderValue::from_static(OPENROUTER_TITLE),
    );
    Ok(headers)
}

fn unchanged_body(_: &mut ChatRequest) {}

fn anthropic_body(request: &mut ChatRequest) {
    for message in &mut request.messages {
        if message.role != "user" {
            message.role = "assistant".to_string();
        }
    }
    request.max_tokens = Some(ANTHROPIC_MAX_TOKENS);
}

fn ollama_body(request: &mut ChatRequest) {
    request.stream = Some(false);
}

// Empty strings count as missing, same as absent fields.
fn text_at(body: &Value, pointer: &str) -> Option<String> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

fn extract_chat_completion(body: &Value) -> Option<String> {
    text_at(body, "/choices/0/message/content")
}

fn extract_anthropic(body: &Value) -> Option<String> {
    text_at(body, "/content/0/text")
}

fn extract_ollama(body: &Value) -> Option<String> {
    text_at(body, "/message/content")
}

fn extract_custom(body: &Value) -> Option<String> {
    extract_chat_completion(body).or_else(|| text_at(body, "/response"))
}
