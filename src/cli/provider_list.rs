use std::error::Error;

use crate::auth::{AuthManager, ProviderAuthStatus};
use crate::core::config::Config;
use crate::core::providers::DEFAULT_PROVIDER;

pub fn format_provider_table(providers: &[ProviderAuthStatus]) -> String {
    let mut content = String::from("Available Providers:\n\n");
    content.push_str(&format!(
        "  {:<12} {:<22} {}\n",
        "Provider", "Display Name", "Key"
    ));

    let mut any_default = false;
    for status in providers {
        let id = if status.is_default {
            any_default = true;
            format!("{}*", status.id)
        } else {
            status.id.clone()
        };
        let key_status = match (status.requires_key, status.has_token) {
            (false, _) => "not needed",
            (true, true) => "✅",
            (true, false) => "❌",
        };
        content.push_str(&format!(
            "  {:<12} {:<22} {}\n",
            id, status.display_name, key_status
        ));
    }

    if any_default {
        content.push_str("\n* = default provider");
    } else {
        content.push_str(&format!(
            "\nNo default provider set; using {DEFAULT_PROVIDER}."
        ));
    }
    content
}

pub fn list_providers() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let auth_manager = AuthManager::new();
    let providers = auth_manager.provider_statuses(&config);
    println!("{}", format_provider_table(&providers));
    Ok(())
}
