//! Built-in provider catalog
//!
//! Display names and suggested models for each provider, loaded from the
//! builtin_models.toml file embedded at build time. The wire behaviour of a
//! provider lives in [`crate::core::adapters`]; this is only what the user
//! picks from.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogModel {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinProvider {
    pub id: String,
    pub display_name: String,
    /// The model is typed by the user rather than picked from the list.
    #[serde(default)]
    pub free_text_model: bool,
    #[serde(default)]
    pub models: Vec<CatalogModel>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BuiltinProvidersConfig {
    providers: Vec<BuiltinProvider>,
}

impl BuiltinProvider {
    pub fn default_model(&self) -> Option<&CatalogModel> {
        self.models.first()
    }

    pub fn has_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m.id == model)
    }
}

/// Load built-in providers from the embedded configuration
pub fn load_builtin_providers() -> Vec<BuiltinProvider> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_models.toml");

    let config: BuiltinProvidersConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_models.toml");

    config.providers
}

/// Find a built-in provider by ID (case-insensitive)
pub fn find_builtin_provider(id: &str) -> Option<BuiltinProvider> {
    load_builtin_providers()
        .into_iter()
        .find(|p| p.id.eq_ignore_ascii_case(id))
}

/// The model selected when switching to `provider` without naming one.
pub fn default_model_for(provider: &str) -> Option<String> {
    find_builtin_provider(provider)
        .and_then(|p| p.default_model().map(|model| model.id.clone()))
}
