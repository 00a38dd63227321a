//! Error types for settings operations.

use thiserror::Error;

use crate::core::config::ConfigError;

/// Errors that can occur when modifying configuration settings.
#[derive(Debug, Error)]
pub enum SettingError {
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("{kind} '{input}' is not valid")]
    InvalidValue {
        kind: &'static str,
        input: String,
        hint: &'static str,
    },

    /// Required arguments are missing.
    #[error("{hint}")]
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
            }
            SettingError::UnknownProvider(input) => {
                eprintln!(
                    "❌ Unknown provider: {input}. Run 'chatdock providers' to list available providers."
                );
            }
            SettingError::InvalidValue { kind, input, hint } => {
                eprintln!("❌ {kind} '{input}' is not valid.");
                eprintln!("   {hint}");
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
            SettingError::Config(err) => {
                eprintln!("❌ Failed to save configuration: {err}");
            }
        }
    }
}
