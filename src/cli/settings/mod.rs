//! Settings management for the `set` and `unset` commands.
//!
//! Each configuration key has a [`SettingHandler`]. Handlers only touch the
//! in-memory [`Config`]; loading and saving happen once around them in
//! [`run_set`] and [`run_unset`].

pub mod error;
pub mod handlers;

pub use error::SettingError;

use crate::core::builtin_providers::find_builtin_provider;
use crate::core::config::Config;

use handlers::{
    DefaultModelHandler, DefaultProviderHandler, EndpointHandler, ProfileNameHandler,
    TemperatureHandler,
};

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Apply `args` and return the message to show on success.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value. `arg` is the optional argument after the key, such as
    /// the provider for `default-model`.
    fn unset(&self, arg: Option<&str>, config: &mut Config) -> Result<String, SettingError>;
}

/// All setting handlers, in the order they are listed in help output.
pub struct SettingRegistry {
    handlers: Vec<Box<dyn SettingHandler>>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        Self {
            handlers: vec![
                Box::new(DefaultProviderHandler),
                Box::new(DefaultModelHandler),
                Box::new(TemperatureHandler),
                Box::new(EndpointHandler),
                Box::new(ProfileNameHandler),
            ],
        }
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.key() == key)
            .map(|handler| handler.as_ref())
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.key()).collect()
    }

    pub fn apply_set(
        &self,
        key: &str,
        args: &[String],
        config: &mut Config,
    ) -> Result<String, SettingError> {
        self.get(key)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?
            .set(args, config)
    }

    pub fn apply_unset(
        &self,
        key: &str,
        arg: Option<&str>,
        config: &mut Config,
    ) -> Result<String, SettingError> {
        self.get(key)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?
            .unset(arg, config)
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a provider name to its canonical id.
pub fn validate_provider(input: &str) -> Result<String, SettingError> {
    find_builtin_provider(input.trim())
        .map(|provider| provider.id)
        .ok_or_else(|| SettingError::UnknownProvider(input.to_string()))
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}

/// `chatdock set [key value...]`. Without a key, prints the current configuration.
pub fn run_set(key: Option<String>, value: Vec<String>) -> Result<(), SettingError> {
    let mut config = Config::load()?;
    let Some(key) = key else {
        config.print_all();
        println!();
        println!("Settable keys: {}", SettingRegistry::new().keys().join(", "));
        return Ok(());
    };

    let message = SettingRegistry::new().apply_set(&key, &value, &mut config)?;
    config.save()?;
    println!("{message}");
    Ok(())
}

/// `chatdock unset <key> [value]`.
pub fn run_unset(key: String, value: Option<String>) -> Result<(), SettingError> {
    let mut config = Config::load()?;
    let message = SettingRegistry::new().apply_unset(&key, value.as_deref(), &mut config)?;
    config.save()?;
    println!("{message}");
    Ok(())
}
