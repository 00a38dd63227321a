use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::adapters::AdapterRegistry;

/// An auxiliary MCP server entry. Stored and listed only; nothing connects to it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct McpServer {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    pub default_provider: Option<String>,
    #[serde(default)]
    pub default_models: HashMap<String, String>,
    /// Sampling temperature between 0.0 and 2.0
    pub temperature: Option<f64>,
    /// Endpoint used by the `custom` provider
    pub custom_endpoint: Option<String>,
    /// Replacement endpoints for built-in providers (e.g. a remote Ollama host)
    /// Key: provider id, value: absolute URL
    #[serde(default)]
    pub endpoint_overrides: HashMap<String, String>,
    /// Name shown for the user in transcripts
    pub profile_name: Option<String>,
    #[serde(default)]
    pub mcp_servers: Vec<McpServer>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn get_default_model(&self, provider: &str) -> Option<&String> {
        self.default_models.get(provider)
    }

    pub fn set_default_model(&mut self, provider: String, model: String) {
        self.default_models.insert(provider, model);
    }

    pub fn unset_default_model(&mut self, provider: &str) {
        self.default_models.remove(provider);
    }

    pub fn profile_name(&self) -> &str {
        self.profile_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("User")
    }

    /// Built-in adapters with this config's endpoint overrides applied.
    pub fn adapter_registry(&self) -> AdapterRegistry {
        self.endpoint_overrides
            .iter()
            .fold(AdapterRegistry::builtin(), |registry, (provider, url)| {
                registry.with_endpoint_override(provider, url.clone())
            })
    }

    /// Add an MCP server and return the id it was stored under.
    pub fn add_mcp_server(&mut self, name: &str, url: &str) -> String {
        let base = match suggest_id(name) {
            id if id.is_empty() => "server".to_string(),
            id => id,
        };
        let mut id = base.clone();
        let mut suffix = 2;
        while self.get_mcp_server(&id).is_some() {
            id = format!("{base}{suffix}");
            suffix += 1;
        }

        self.mcp_servers.push(McpServer {
            id: id.clone(),
            name: name.to_string(),
            url: url.to_string(),
            enabled: true,
        });
        id
    }

    /// Returns false when no server has that id.
    pub fn remove_mcp_server(&mut self, id: &str) -> bool {
        let before = self.mcp_servers.len();
        self.mcp_servers
            .retain(|server| !server.id.eq_ignore_ascii_case(id));
        self.mcp_servers.len() != before
    }

    pub fn set_mcp_server_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self
            .mcp_servers
            .iter_mut()
            .find(|server| server.id.eq_ignore_ascii_case(id))
        {
            Some(server) => {
                server.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn get_mcp_server(&self, id: &str) -> Option<&McpServer> {
        self.mcp_servers
            .iter()
            .find(|server| server.id.eq_ignore_ascii_case(id))
    }

    pub fn list_mcp_servers(&self) -> &[McpServer] {
        &self.mcp_servers
    }
}

/// Generate a suggested ID from a display name
/// Converts to lowercase and keeps only alphanumeric characters
pub fn suggest_id(display_name: &str) -> String {
    display_name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}
