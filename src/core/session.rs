//! Chat sessions and the recents list.
//!
//! A [`ChatSession`] owns one conversation and is the caller the dispatch
//! core expects: it hands the trailing window to [`Dispatcher::send_message`]
//! and records the user's message together with whatever comes back. Sending
//! takes `&mut self`, so a session can never have two requests in flight.

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::dispatch::{DispatchError, Dispatcher, TRAILING_WINDOW};
use crate::core::message::{Conversation, Message};
use crate::core::providers::ProviderConfig;

pub const DEFAULT_TITLE: &str = "New Chat";
const TITLE_CHARS: usize = 20;

/// Shown in the transcript in place of a reply when a send fails.
pub const FAILURE_REPLY: &str =
    "Sorry, I encountered an error. Please check your settings and try again.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyPrompt,

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    conversation: Conversation,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_conversation(Conversation::new())
    }

    pub fn with_conversation(conversation: Conversation) -> Self {
        Self {
            id: Uuid::now_v7(),
            conversation,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The first few characters of the opening message.
    pub fn title(&self) -> String {
        match self.conversation.first() {
            Some(message) if !message.content.trim().is_empty() => {
                message.content.chars().take(TITLE_CHARS).collect()
            }
            _ => DEFAULT_TITLE.to_string(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    /// Send one message and record the exchange.
    ///
    /// On failure the transcript gets [`FAILURE_REPLY`] as the assistant turn
    /// and the underlying error is returned for the caller to report.
    pub async fn send(
        &mut self,
        dispatcher: &Dispatcher,
        text: &str,
        config: &ProviderConfig,
    ) -> Result<String, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyPrompt);
        }

        // The user turn is recorded only once dispatch resolves, so a dropped
        // future leaves the transcript untouched.
        let history = self.conversation.tail(TRAILING_WINDOW).to_vec();
        let user_message = Message::user(text);
        debug!(
            session = %self.id,
            provider = %config.provider,
            model = %config.model,
            context = history.len(),
            "Dispatching message"
        );

        match dispatcher.send_message(&history, text, config).await {
            Ok(reply) => {
                self.conversation.push(user_message);
                self.conversation.push(Message::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                warn!(session = %self.id, provider = %config.provider, error = %err, "Dispatch failed");
                self.conversation.push(user_message);
                self.conversation.push(Message::assistant(FAILURE_REPLY));
                Err(err.into())
            }
        }
    }
}

/// Sessions in most-recently-created-first order, plus which one is open.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    sessions: Vec<ChatSession>,
    current: Uuid,
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHistory {
    pub fn new() -> Self {
        let session = ChatSession::new();
        Self {
            current: session.id(),
            sessions: vec![session],
        }
    }

    /// Start a fresh session and make it current. An empty current session is
    /// reused rather than leaving a blank entry in the list.
    pub fn new_session(&mut self) -> Uuid {
        if self.current().conversation().is_empty() {
            return self.current;
        }
        self.push_front(ChatSession::new())
    }

    /// Add an existing conversation (e.g. an imported export) and open it.
    pub fn open(&mut self, conversation: Conversation) -> Uuid {
        self.push_front(ChatSession::with_conversation(conversation))
    }

    fn push_front(&mut self, session: ChatSession) -> Uuid {
        let id = session.id();
        self.sessions.insert(0, session);
        self.current = id;
        id
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.sessions.iter().position(|session| session.id() == id)
    }

    pub fn current(&self) -> &ChatSession {
        let index = self.position(self.current).unwrap_or(0);
        &self.sessions[index]
    }

    pub fn current_mut(&mut self) -> &mut ChatSession {
        let index = self.position(self.current).unwrap_or(0);
        &mut self.sessions[index]
    }

    /// Returns false if no session has that id.
    pub fn select(&mut self, id: Uuid) -> bool {
        if self.position(id).is_some() {
            self.current = id;
            true
        } else {
            false
        }
    }

    /// Remove a session. Removing the last one leaves a fresh empty session.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.sessions.remove(index);
        if self.sessions.is_empty() {
            self.sessions.push(ChatSession::new());
        }
        if self.current == id {
            self.current = self.sessions[0].id();
        }
        true
    }

    pub fn list(&self) -> &[ChatSession] {
        &self.sessions
    }
}
