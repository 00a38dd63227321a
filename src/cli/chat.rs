//! Line-oriented interactive chat.
//!
//! Every line that is not a slash command is sent through the current
//! session. Ctrl+C while a request is in flight drops that request; Ctrl+C at
//! the prompt ends the chat.

use std::error::Error;
use std::future::Future;
use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::auth::AuthManager;
use crate::core::config::{Config, McpServer};
use crate::core::dispatch::Dispatcher;
use crate::core::export::{ChatExport, ExportedSettings};
use crate::core::message::Role;
use crate::core::providers::{resolve_provider_config, ProviderConfig, ProviderOverrides};
use crate::core::session::{SessionError, SessionHistory};

const HELP_TEXT: &str = "Commands:
  /new              Start a new chat
  /history          List chats, newest first
  /switch <n>       Open chat number <n> from /history
  /clear            Clear the current chat
  /export [file]    Save the current chat as JSON
  /import <file>    Open a chat saved with /export
  /help             Show this help
  /quit             Exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    New,
    History,
    Switch(usize),
    Clear,
    Export(Option<String>),
    Import(String),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Empty,
    Message(String),
    Command(ReplCommand),
    Invalid(String),
}

pub fn parse_line(line: &str) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ReplInput::Message(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };

    let command = match (name.to_ascii_lowercase().as_str(), arg) {
        ("new", _) => ReplCommand::New,
        ("history", _) => ReplCommand::History,
        ("switch", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => ReplCommand::Switch(n),
            _ => return ReplInput::Invalid(format!("Not a chat number: {n}")),
        },
        ("switch", None) => return ReplInput::Invalid("Usage: /switch <n>".to_string()),
        ("clear", _) => ReplCommand::Clear,
        ("export", arg) => ReplCommand::Export(arg.map(str::to_string)),
        ("import", Some(path)) => ReplCommand::Import(path.to_string()),
        ("import", None) => return ReplInput::Invalid("Usage: /import <file>".to_string()),
        ("help", _) => ReplCommand::Help,
        ("quit" | "exit", _) => ReplCommand::Quit,
        (other, _) => {
            return ReplInput::Invalid(format!("Unknown command: /{other}. Type /help for help."))
        }
    };
    ReplInput::Command(command)
}

pub struct ChatRepl {
    dispatcher: Dispatcher,
    provider: ProviderConfig,
    mcp_servers: Vec<McpServer>,
    profile_name: String,
    history: SessionHistory,
}

impl ChatRepl {
    pub fn new(dispatcher: Dispatcher, provider: ProviderConfig, config: &Config) -> Self {
        Self {
            dispatcher,
            provider,
            mcp_servers: config.list_mcp_servers().to_vec(),
            profile_name: config.profile_name().to_string(),
            history: SessionHistory::new(),
        }
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Send `text` through the current session and print the outcome.
    pub async fn send<W: Write>(&mut self, text: &str, out: &mut W) -> io::Result<()> {
        let session = self.history.current_mut();
        match session.send(&self.dispatcher, text, &self.provider).await {
            Ok(reply) => writeln!(out, "{reply}\n"),
            Err(SessionError::EmptyPrompt) => Ok(()),
            Err(SessionError::Dispatch(err)) => {
                writeln!(out, "{}", crate::core::session::FAILURE_REPLY)?;
                super::write_dispatch_error(&err, out)?;
                writeln!(out)
            }
        }
    }

    /// Run one slash command. Returns false when the loop should stop.
    pub fn run_command<W: Write>(&mut self, command: ReplCommand, out: &mut W) -> io::Result<bool> {
        match command {
            ReplCommand::New => {
                self.history.new_session();
                writeln!(out, "Started a new chat.")?;
            }
            ReplCommand::History => {
                let current = self.history.current().id();
                for (index, session) in self.history.list().iter().enumerate() {
                    let marker = if session.id() == current { "*" } else { " " };
                    writeln!(
                        out,
                        "{marker} {:>2}. {} ({} messages)",
                        index + 1,
                        session.title(),
                        session.conversation().len()
                    )?;
                }
            }
            ReplCommand::Switch(n) => match self.history.list().get(n - 1).map(|s| s.id()) {
                Some(id) => {
                    self.history.select(id);
                    self.print_transcript(out)?;
                }
                None => writeln!(out, "No chat number {n}. Type /history to list chats.")?,
            },
            ReplCommand::Clear => {
                self.history.current_mut().clear();
                writeln!(out, "Chat cleared.")?;
            }
            ReplCommand::Export(path) => {
                let path = path
                    .unwrap_or_else(|| ChatExport::default_file_name(Utc::now().date_naive()));
                let settings =
                    ExportedSettings::from_provider_config(&self.provider, &self.mcp_servers);
                let export = ChatExport::new(
                    settings,
                    self.history.current().conversation().messages(),
                );
                match export.write_to_path(Path::new(&path), false) {
                    Ok(()) => writeln!(out, "✅ Chat exported to {path}")?,
                    Err(err) => writeln!(out, "❌ {err}")?,
                }
            }
            ReplCommand::Import(path) => match ChatExport::read_from_path(Path::new(&path)) {
                Ok(export) => {
                    debug!(
                        provider = %export.settings.llm_provider,
                        model = %export.settings.model,
                        messages = export.messages.len(),
                        "Imported chat"
                    );
                    self.history.open(export.into_conversation());
                    self.print_transcript(out)?;
                }
                Err(err) => writeln!(out, "❌ {err}")?,
            },
            ReplCommand::Help => writeln!(out, "{HELP_TEXT}")?,
            ReplCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn print_transcript<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let session = self.history.current();
        writeln!(out, "── {} ──", session.title())?;
        for message in session.conversation().messages() {
            match message.role {
                Role::User => writeln!(out, "{}: {}", self.profile_name, message.content)?,
                Role::Assistant => writeln!(out, "{}", message.content)?,
            }
        }
        Ok(())
    }
}

pub async fn run_chat(overrides: ProviderOverrides) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let provider = resolve_provider_config(&AuthManager::new(), &config, &overrides);
    let dispatcher = Dispatcher::new(config.adapter_registry());
    let mut repl = ChatRepl::new(dispatcher, provider, &config);

    println!(
        "💬 Chatting with {} ({}). Type /help for commands, /quit to exit.",
        repl.provider().provider,
        repl.provider().model
    );

    run_loop(
        &mut repl,
        BufReader::new(tokio::io::stdin()),
        &mut io::stdout(),
        tokio::signal::ctrl_c,
    )
    .await?;
    Ok(())
}

/// Read lines from `input` until EOF, `/quit`, or `interrupt` fires at the
/// prompt. While a request is in flight, `interrupt` only cancels it.
pub async fn run_loop<R, W, F, Fut>(
    repl: &mut ChatRepl,
    input: R,
    out: &mut W,
    mut interrupt: F,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupt() => {
                writeln!(out)?;
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        match parse_line(&line) {
            ReplInput::Empty => {}
            ReplInput::Invalid(message) => writeln!(out, "{message}")?,
            ReplInput::Command(command) => {
                if !repl.run_command(command, out)? {
                    break;
                }
            }
            ReplInput::Message(text) => {
                tokio::select! {
                    result = repl.send(&text, out) => result?,
                    _ = interrupt() => writeln!(out, "\n⚠️  Request cancelled")?,
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::adapters::AdapterRegistry;
    use crate::core::session::FAILURE_REPLY;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn parses_messages_and_commands() {
        assert_eq!(parse_line("   "), ReplInput::Empty);
        assert_eq!(
            parse_line(" hello there "),
            ReplInput::Message("hello there".to_string())
        );
        assert_eq!(parse_line("/new"), ReplInput::Command(ReplCommand::New));
        assert_eq!(
            parse_line("/switch 3"),
            ReplInput::Command(ReplCommand::Switch(3))
        );
        assert_eq!(
            parse_line("/export"),
            ReplInput::Command(ReplCommand::Export(None))
        );
        assert_eq!(
            parse_line("/export  my chat.json "),
            ReplInput::Command(ReplCommand::Export(Some("my chat.json".to_string())))
        );
        assert_eq!(parse_line("/QUIT"), ReplInput::Command(ReplCommand::Quit));
        assert!(matches!(parse_line("/switch"), ReplInput::Invalid(_)));
        assert!(matches!(parse_line("/switch 0"), ReplInput::Invalid(_)));
        assert!(matches!(parse_line("/import"), ReplInput::Invalid(_)));
        assert!(matches!(parse_line("/dance"), ReplInput::Invalid(_)));
    }

    async fn repl_against(server: &MockServer) -> ChatRepl {
        let registry = AdapterRegistry::builtin()
            .with_endpoint_override("ollama", format!("{}/api/chat", server.uri()));
        let config = Config {
            profile_name: Some("Ada".to_string()),
            ..Default::default()
        };
        ChatRepl::new(
            Dispatcher::new(registry),
            ProviderConfig::new("ollama", "llama2", ""),
            &config,
        )
    }

    #[tokio::test]
    async fn sends_exports_and_reimports_a_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": {"content": "Hello, Ada."}})),
            )
            .mount(&server)
            .await;
        let mut repl = repl_against(&server).await;
        let mut out = Vec::new();

        repl.send("Hi!", &mut out).await.unwrap();
        assert!(String::from_utf8_lossy(&out).contains("Hello, Ada."));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.json");
        let path_str = path.to_string_lossy().to_string();
        assert!(repl
            .run_command(ReplCommand::Export(Some(path_str.clone())), &mut out)
            .unwrap());
        assert!(path.exists());

        repl.run_command(ReplCommand::New, &mut out).unwrap();
        assert!(repl.history().current().conversation().is_empty());

        out.clear();
        repl.run_command(ReplCommand::Import(path_str), &mut out)
            .unwrap();
        let printed = String::from_utf8_lossy(&out);
        assert!(printed.contains("Ada: Hi!"));
        assert!(printed.contains("Hello, Ada."));
        assert_eq!(repl.history().current().conversation().len(), 2);
        assert_eq!(repl.history().list().len(), 3);
    }

    #[tokio::test]
    async fn failed_send_prints_apology_and_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let mut repl = repl_against(&server).await;
        let mut out = Vec::new();

        repl.send("Hi!", &mut out).await.unwrap();
        let printed = String::from_utf8_lossy(&out);
        assert!(printed.contains(FAILURE_REPLY));
        assert!(printed.contains("API request failed: 503 Service Unavailable"));
    }

    #[tokio::test]
    async fn configuration_error_prints_quick_fixes() {
        let config = Config::default();
        let mut repl = ChatRepl::new(
            Dispatcher::default(),
            ProviderConfig::new("openai", "gpt-4", ""),
            &config,
        );
        let mut out = Vec::new();

        repl.send("Hi!", &mut out).await.unwrap();
        let printed = String::from_utf8_lossy(&out);
        assert!(printed.contains(FAILURE_REPLY));
        assert!(printed.contains("  • chatdock auth openai"));
        assert!(printed.contains("  • export OPENAI_API_KEY=..."));
    }

    #[tokio::test]
    async fn loop_runs_commands_until_quit() {
        let server = MockServer::start().await;
        let mut repl = repl_against(&server).await;
        let mut out = Vec::new();
        let input = BufReader::new(&b"/help\n/dance\n/quit\n/new\n"[..]);

        run_loop(&mut repl, input, &mut out, std::future::pending)
            .await
            .unwrap();

        let printed = String::from_utf8_lossy(&out);
        assert!(printed.starts_with("> Commands:"));
        assert!(printed.contains("Unknown command: /dance"));
        assert!(!printed.contains("Started a new chat."));
    }

    #[tokio::test]
    async fn interrupt_at_the_prompt_ends_the_loop() {
        let server = MockServer::start().await;
        let mut repl = repl_against(&server).await;
        let mut out = Vec::new();
        // Keep the write half open so the prompt never sees EOF.
        let (_keyboard, stdin) = tokio::io::duplex(64);

        let finished = tokio::time::timeout(
            Duration::from_secs(2),
            run_loop(&mut repl, BufReader::new(stdin), &mut out, || {
                std::future::ready(Ok(()))
            }),
        )
        .await;

        assert!(matches!(finished, Ok(Ok(()))));
        assert_eq!(String::from_utf8_lossy(&out), "> \n");
        assert!(repl.history().current().conversation().is_empty());
    }

    #[tokio::test]
    async fn history_and_switch() {
        let server = MockServer::start().await;
        let mut repl = repl_against(&server).await;
        let mut out = Vec::new();

        repl.run_command(ReplCommand::History, &mut out).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("1. New Chat (0 messages)"));

        out.clear();
        repl.run_command(ReplCommand::Switch(5), &mut out).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("No chat number 5"));

        out.clear();
        repl.run_command(ReplCommand::Export(None), &mut out).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("the chat history is empty"));

        assert!(!repl.run_command(ReplCommand::Quit, &mut out).unwrap());
    }
}
