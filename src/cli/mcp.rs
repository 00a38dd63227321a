//! `chatdock mcp ...`: manage the stored MCP server list.
//!
//! Servers are only recorded in the config and carried into exports; nothing
//! here connects to them.

use std::error::Error;

use crate::cli::McpCommands;
use crate::core::config::{Config, McpServer};

/// Apply one MCP command to `config`. Returns the text to print and whether
/// the config changed and needs saving.
pub fn apply_mcp_command(
    command: McpCommands,
    config: &mut Config,
) -> Result<(String, bool), Box<dyn Error>> {
    match command {
        McpCommands::List => Ok((format_server_list(config.list_mcp_servers()), false)),
        McpCommands::Add { name, url } => {
            reqwest::Url::parse(&url).map_err(|_| format!("'{url}' is not an absolute URL"))?;
            if name.trim().is_empty() {
                return Err("MCP server name cannot be empty".into());
            }
            let id = config.add_mcp_server(name.trim(), &url);
            Ok((format!("✅ Added MCP server '{id}' ({url})"), true))
        }
        McpCommands::Remove { id } => {
            if config.remove_mcp_server(&id) {
                Ok((format!("✅ Removed MCP server '{id}'"), true))
            } else {
                Err(unknown_server(config, &id).into())
            }
        }
        McpCommands::Enable { id } => toggle(config, &id, true),
        McpCommands::Disable { id } => toggle(config, &id, false),
    }
}

fn toggle(config: &mut Config, id: &str, enabled: bool) -> Result<(String, bool), Box<dyn Error>> {
    if !config.set_mcp_server_enabled(id, enabled) {
        return Err(unknown_server(config, id).into());
    }
    let state = if enabled { "enabled" } else { "disabled" };
    Ok((format!("✅ MCP server '{id}' {state}"), true))
}

fn unknown_server(config: &Config, id: &str) -> String {
    let available: Vec<_> = config
        .list_mcp_servers()
        .iter()
        .map(|server| server.id.as_str())
        .collect();
    if available.is_empty() {
        format!("MCP server '{id}' not found. No MCP servers are configured.")
    } else {
        format!(
            "MCP server '{id}' not found. Available servers: {}",
            available.join(", ")
        )
    }
}

pub fn format_server_list(servers: &[McpServer]) -> String {
    if servers.is_empty() {
        return "No MCP servers configured. Add one with 'chatdock mcp add <name> <url>'."
            .to_string();
    }

    let mut output = String::from("MCP servers:\n");
    for server in servers {
        let state = if server.enabled { "on " } else { "off" };
        output.push_str(&format!(
            "  [{state}] {} - {} ({})\n",
            server.id, server.name, server.url
        ));
    }
    output.pop();
    output
}

pub fn run_mcp(command: McpCommands) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    let (message, changed) = apply_mcp_command(command, &mut config)?;
    if changed {
        config.save()?;
    }
    println!("{message}");
    Ok(())
}
