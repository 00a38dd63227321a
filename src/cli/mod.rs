//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod credentials;
pub mod mcp;
pub mod model_list;
pub mod provider_list;
pub mod say;
pub mod settings;

#[cfg(test)]
mod tests;

use std::error::Error;
use std::io::{self, Write};

use clap::{Parser, Subcommand};

use crate::auth::AuthManager;
use crate::cli::chat::run_chat;
use crate::cli::credentials::{run_auth, run_deauth};
use crate::cli::mcp::run_mcp;
use crate::cli::model_list::list_models;
use crate::cli::provider_list::list_providers;
use crate::cli::say::run_say;
use crate::cli::settings::{run_set, run_unset};
use crate::core::dispatch::DispatchError;
use crate::core::providers::ProviderOverrides;
use crate::utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "chatdock")]
#[command(version)]
#[command(about = "Chat with OpenAI, Anthropic, OpenRouter, Ollama or your own endpoint")]
#[command(
    long_about = "chatdock sends your messages to one of several LLM providers and prints \
the replies. Each request carries the last 10 messages of the chat as context.\n\n\
Authentication:\n\
  Use 'chatdock auth <provider>' to store an API key in your system keyring.\n\
  Ollama runs locally and needs no key.\n\n\
Environment Variables:\n\
  <PROVIDER>_API_KEY  API key used when the keyring has none (e.g. OPENAI_API_KEY)\n\
  CHATDOCK_CONFIG     Path of the config file to use\n\
  CHATDOCK_LOG        Diagnostic log filter written to stderr (e.g. debug)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Provider to use (openai, anthropic, openrouter, ollama, custom)
    #[arg(short = 'p', long, global = true, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Model to use for chat
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature between 0 and 2
    #[arg(short = 't', long, global = true, value_name = "TEMP")]
    pub temperature: Option<f64>,

    /// Endpoint for the custom provider
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,
}

impl Args {
    pub fn overrides(&self) -> ProviderOverrides {
        ProviderOverrides {
            provider: self.provider.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            endpoint: self.endpoint.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// The message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List providers and whether a key is available
    Providers,
    /// List suggested models for a provider
    Models {
        /// Provider to list models for (defaults to the configured provider)
        provider: Option<String>,
    },
    /// Store an API key for a provider, read from stdin
    Auth {
        provider: String,
    },
    /// Remove the stored API key for a provider
    Deauth {
        provider: String,
    },
    /// Set configuration values, or show them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
        /// Value to unset for the key (optional)
        value: Option<String>,
    },
    /// Manage MCP servers
    Mcp {
        #[command(subcommand)]
        command: McpCommands,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum McpCommands {
    /// List configured MCP servers
    List,
    /// Add an MCP server
    Add {
        /// Display name (quote names with spaces)
        name: String,
        /// Server URL
        url: String,
    },
    /// Remove an MCP server
    Remove { id: String },
    /// Enable an MCP server
    Enable { id: String },
    /// Disable an MCP server
    Disable { id: String },
}

/// Suggestions printed under a configuration error.
pub fn quick_fixes(err: &DispatchError) -> Vec<String> {
    match err {
        DispatchError::MissingCredential(provider) | DispatchError::InvalidCredential(provider) => {
            vec![
                format!("chatdock auth {provider}"),
                format!("export {}=...", AuthManager::env_var_name(provider)),
            ]
        }
        DispatchError::UnsupportedProvider(_) => vec![
            "chatdock providers".to_string(),
            "chatdock set default-provider openai".to_string(),
        ],
        DispatchError::MissingEndpoint | DispatchError::InvalidEndpoint(_) => vec![
            "chatdock set endpoint http://localhost:8080/v1/chat/completions".to_string(),
            "chatdock --endpoint <url> ...".to_string(),
        ],
        DispatchError::InvalidTemperature(_) => vec!["chatdock set temperature 0.7".to_string()],
        _ => Vec::new(),
    }
}

/// Print a dispatch error, followed by quick fixes when it is a
/// configuration problem.
pub fn write_dispatch_error<W: Write>(err: &DispatchError, out: &mut W) -> io::Result<()> {
    writeln!(out, "❌ Error: {err}")?;
    if err.is_configuration() {
        for fix in quick_fixes(err) {
            writeln!(out, "  • {fix}")?;
        }
    }
    Ok(())
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let overrides = args.overrides();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(overrides).await,
        Commands::Say { prompt } => run_say(prompt, overrides).await,
        Commands::Providers => list_providers(),
        Commands::Models { provider } => list_models(provider.or(args.provider)),
        Commands::Auth { provider } => {
            if let Err(e) = run_auth(&provider) {
                eprintln!("❌ Authentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Deauth { provider } => {
            if let Err(e) = run_deauth(&provider) {
                eprintln!("❌ Deauthentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            if let Err(e) = run_set(key, value) {
                e.print();
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Unset { key, value } => {
            if let Err(e) = run_unset(key, value) {
                e.print();
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Mcp { command } => {
            if let Err(e) = run_mcp(command) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
