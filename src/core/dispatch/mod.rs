//! One request/response cycle against a chosen provider.
//!
//! [`Dispatcher::send_message`] validates the provider configuration, builds
//! the request through the provider's adapter, performs exactly one HTTP call
//! and normalizes the reply to plain text. It holds no conversation state and
//! never retries; callers own the transcript and decide what to do on failure.

mod error;

pub use error::{DispatchError, ErrorKind};

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::api::{ChatMessage, ChatRequest};
use crate::core::adapters::{AdapterRegistry, ProviderAdapter};
use crate::core::message::{trailing_window, Message};
use crate::core::providers::ProviderConfig;

/// Number of prior messages sent as context with each request.
pub const TRAILING_WINDOW: usize = 10;

/// Status text for codes without a registered reason phrase.
pub const UNKNOWN_STATUS_TEXT: &str = "Unknown Status";

/// A request ready to be sent: endpoint, headers and provider-shaped body.
#[derive(Debug)]
pub struct PreparedRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: ChatRequest,
    adapter: ProviderAdapter,
}

impl PreparedRequest {
    pub fn provider(&self) -> &'static str {
        self.adapter.id
    }
}

/// The payload every adapter starts from before applying its own changes.
pub fn base_request(tail: &[Message], user_text: &str, config: &ProviderConfig) -> ChatRequest {
    let mut messages: Vec<ChatMessage> = trailing_window(tail, TRAILING_WINDOW)
        .iter()
        .map(ChatMessage::from)
        .collect();
    messages.push(ChatMessage::user(user_text));

    ChatRequest {
        model: config.model.clone(),
        messages,
        temperature: config.temperature,
        max_tokens: None,
        stream: None,
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    registry: AdapterRegistry,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(AdapterRegistry::builtin())
    }
}

impl Dispatcher {
    pub fn new(registry: AdapterRegistry) -> Self {
        Self::with_client(reqwest::Client::new(), registry)
    }

    pub fn with_client(client: reqwest::Client, registry: AdapterRegistry) -> Self {
        Self { client, registry }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Validate the configuration and build the request without sending it.
    pub fn prepare(
        &self,
        tail: &[Message],
        user_text: &str,
        config: &ProviderConfig,
    ) -> Result<PreparedRequest, DispatchError> {
        let adapter = *self
            .registry
            .find(&config.provider)
            .ok_or_else(|| DispatchError::UnsupportedProvider(config.provider.clone()))?;

        if adapter.requires_credential && !config.has_credential() {
            return Err(DispatchError::MissingCredential(adapter.id.to_string()));
        }
        if !(0.0..=2.0).contains(&config.temperature) {
            return Err(DispatchError::InvalidTemperature(config.temperature));
        }

        let url = self.registry.endpoint_for(&adapter, config)?;
        let headers = (adapter.headers)(config)?;
        let mut body = base_request(tail, user_text, config);
        (adapter.body)(&mut body);

        Ok(PreparedRequest {
            url,
            headers,
            body,
            adapter,
        })
    }

    /// Send `user_text` with up to [`TRAILING_WINDOW`] prior messages of
    /// context and return the provider's reply text.
    ///
    /// A success response without the expected reply field yields
    /// [`crate::core::adapters::NO_RESPONSE_PLACEHOLDER`] rather than an error.
    pub async fn send_message(
        &self,
        tail: &[Message],
        user_text: &str,
        config: &ProviderConfig,
    ) -> Result<String, DispatchError> {
        let PreparedRequest {
            url,
            headers,
            body,
            adapter,
        } = self.prepare(tail, user_text, config)?;

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(DispatchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or(UNKNOWN_STATUS_TEXT)
                    .to_string(),
            });
        }

        let payload: Value = response.json().await.map_err(DispatchError::Decode)?;
        Ok(adapter.extract_reply(&payload))
    }
}
