use super::data::{path_display, suggest_id};
use super::{Config, ConfigError, McpServer};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config.default_provider, None);
    assert!(config.mcp_servers.is_empty());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config {
        default_provider: Some("anthropic".to_string()),
        temperature: Some(0.3),
        custom_endpoint: Some("https://llm.internal/v1/chat/completions".to_string()),
        profile_name: Some("Ada".to_string()),
        ..Default::default()
    };
    config.set_default_model("anthropic".to_string(), "claude-3-opus-20240229".to_string());
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.default_provider.as_deref(), Some("anthropic"));
    assert_eq!(loaded.temperature, Some(0.3));
    assert_eq!(
        loaded.custom_endpoint.as_deref(),
        Some("https://llm.internal/v1/chat/completions")
    );
    assert_eq!(loaded.profile_name(), "Ada");
    assert_eq!(
        loaded.get_default_model("anthropic").map(String::as_str),
        Some("claude-3-opus-20240229")
    );

    let mut modified = loaded;
    modified.unset_default_model("anthropic");
    modified.default_provider = None;
    modified
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(reloaded.default_provider, None);
    assert!(reloaded.default_models.is_empty());

    let leftovers: Vec<_> = fs::read_dir(config_path.parent().unwrap())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.path() != config_path)
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
}

#[test]
fn test_invalid_toml_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "default_provider = [unterminated").unwrap();

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_mcp_server_config_persistence() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("test_mcp.toml");

    let mut config = Config::default();
    let id = config.add_mcp_server("Alpha MCP", "https://mcp.example.com");
    assert_eq!(id, "alphamcp");
    assert!(config.set_mcp_server_enabled(&id, false));
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(
        loaded.list_mcp_servers(),
        &[McpServer {
            id: "alphamcp".to_string(),
            name: "Alpha MCP".to_string(),
            url: "https://mcp.example.com".to_string(),
            enabled: false,
        }]
    );
}

#[test]
fn test_mcp_server_enabled_defaults_to_true() {
    let config: Config = toml::from_str(
        r#"
[[mcp_servers]]
id = "files"
name = "Files"
url = "http://localhost:3000"
"#,
    )
    .expect("config parses");
    assert!(config.get_mcp_server("FILES").unwrap().enabled);
}

#[test]
fn test_mcp_server_ids_are_unique() {
    let mut config = Config::default();
    let first = config.add_mcp_server("Search", "https://a.example");
    let second = config.add_mcp_server("search", "https://b.example");
    let third = config.add_mcp_server("!!!", "https://c.example");

    assert_eq!(first, "search");
    assert_eq!(second, "search2");
    assert_eq!(third, "server");

    assert!(config.remove_mcp_server("SEARCH"));
    assert!(!config.remove_mcp_server("search"));
    assert_eq!(config.list_mcp_servers().len(), 2);
    assert!(!config.set_mcp_server_enabled("missing", true));
}

#[test]
fn test_endpoint_overrides_reach_the_registry() {
    let config = Config {
        endpoint_overrides: HashMap::from([(
            "ollama".to_string(),
            "http://gpu-box:11434/api/chat".to_string(),
        )]),
        ..Default::default()
    };
    let registry = config.adapter_registry();
    let adapter = registry.find("ollama").unwrap();
    let provider = crate::core::providers::ProviderConfig::new("ollama", "llama2", "");

    assert_eq!(
        registry.endpoint_for(adapter, &provider).unwrap(),
        "http://gpu-box:11434/api/chat"
    );
}

#[test]
fn test_custom_override_does_not_satisfy_missing_endpoint() {
    let config = Config {
        endpoint_overrides: HashMap::from([(
            "custom".to_string(),
            "http://llm.internal/v1/chat/completions".to_string(),
        )]),
        ..Default::default()
    };
    let dispatcher = crate::core::dispatch::Dispatcher::new(config.adapter_registry());
    let provider = crate::core::providers::ProviderConfig::new("custom", "custom-model", "k");

    let err = dispatcher
        .prepare(&[], "hello", &provider)
        .expect_err("custom needs its own endpoint");
    assert!(matches!(
        err,
        crate::core::dispatch::DispatchError::MissingEndpoint
    ));
}

#[test]
fn test_profile_name_falls_back_to_user() {
    let mut config = Config::default();
    assert_eq!(config.profile_name(), "User");
    config.profile_name = Some(String::new());
    assert_eq!(config.profile_name(), "User");
}

#[test]
fn test_suggest_id() {
    assert_eq!(suggest_id("My Server"), "myserver");
    assert_eq!(suggest_id("files-v2"), "filesv2");
}

#[cfg(unix)]
#[test]
fn test_path_display_keeps_paths_outside_home() {
    assert_eq!(path_display("/etc/chatdock.toml"), "/etc/chatdock.toml");
}
