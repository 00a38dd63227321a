//! `chatdock auth` and `chatdock deauth`.

use std::error::Error;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::auth::AuthManager;
use crate::core::adapters::AdapterRegistry;
use crate::core::builtin_providers::find_builtin_provider;

fn display_name(provider: &str) -> String {
    find_builtin_provider(provider)
        .map(|p| p.display_name)
        .unwrap_or_else(|| provider.to_string())
}

/// Read a key for `provider` from stdin and store it in the keyring.
pub fn run_auth(provider: &str) -> Result<(), Box<dyn Error>> {
    let registry = AdapterRegistry::builtin();
    let adapter = registry
        .find(provider)
        .ok_or_else(|| format!("Unknown provider '{provider}'"))?;
    let name = display_name(adapter.id);

    if !adapter.requires_credential {
        println!("{name} does not need an API key.");
        return Ok(());
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        print!("Enter your {name} API key: ");
        io::stdout().flush()?;
    }
    let mut token = String::new();
    stdin.lock().read_line(&mut token)?;

    AuthManager::new().store_token(adapter.id, token.trim())?;
    println!("✓ Key stored securely for {name}");
    Ok(())
}

pub fn run_deauth(provider: &str) -> Result<(), Box<dyn Error>> {
    let auth_manager = AuthManager::new();
    let name = display_name(provider);
    if auth_manager.remove_token(provider)? {
        println!("✓ Removed stored key for {name}");
    } else {
        println!("No stored key for {name}.");
        let env_var = AuthManager::env_var_name(provider);
        if std::env::var_os(&env_var).is_some() {
            println!("Note: {env_var} is set in the environment and will still be used.");
        }
    }
    Ok(())
}
