//! One-shot "say" command

use std::error::Error;
use std::io;

use tracing::debug;

use crate::auth::AuthManager;
use crate::core::config::Config;
use crate::core::dispatch::Dispatcher;
use crate::core::providers::{resolve_provider_config, ProviderOverrides};
use crate::core::session::{ChatSession, SessionError};

pub async fn run_say(prompt: Vec<String>, overrides: ProviderOverrides) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: chatdock say <prompt>");
        std::process::exit(1);
    }

    let config = Config::load()?;
    let provider = resolve_provider_config(&AuthManager::new(), &config, &overrides);
    debug!(provider = %provider.provider, model = %provider.model, "Resolved provider for say");

    let dispatcher = Dispatcher::new(config.adapter_registry());
    let mut session = ChatSession::new();
    match session.send(&dispatcher, &prompt, &provider).await {
        Ok(reply) => {
            println!("{reply}");
            Ok(())
        }
        Err(SessionError::Dispatch(err)) => {
            super::write_dispatch_error(&err, &mut io::stderr())?;
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}
