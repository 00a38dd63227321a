//! Model listing functionality
//!
//! Lists the suggested models for a provider from the built-in catalog.

use std::error::Error;

use crate::core::builtin_providers::{find_builtin_provider, BuiltinProvider};
use crate::core::config::Config;
use crate::core::providers::DEFAULT_PROVIDER;

pub fn format_model_list(provider: &BuiltinProvider, configured_default: Option<&str>) -> String {
    let mut output = format!("🤖 Models for {}\n", provider.display_name);
    if let Some(model) = configured_default {
        output.push_str(&format!("🎯 Default model for this provider: {model} (from config)\n"));
    }
    output.push('\n');

    for model in &provider.models {
        let marker = if Some(model.id.as_str()) == configured_default {
            "*"
        } else {
            " "
        };
        output.push_str(&format!("  {marker} {:<36} {}\n", model.id, model.label));
    }

    if provider.free_text_model {
        output.push_str("\nAny model id the provider accepts can be used with -m.");
    } else {
        output.pop();
    }
    output
}

pub fn list_models(provider: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let provider_id = provider
        .or_else(|| config.default_provider.clone())
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

    let provider = find_builtin_provider(&provider_id).ok_or_else(|| {
        format!("Unknown provider '{provider_id}'. Run 'chatdock providers' to list providers.")
    })?;
    let configured = config.get_default_model(&provider.id).map(String::as_str);
    println!("{}", format_model_list(&provider, configured));
    Ok(())
}
