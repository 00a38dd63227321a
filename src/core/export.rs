//! JSON export and import of a conversation.
//!
//! The export carries the provider settings that produced the chat so it can
//! be reopened later, but never the credential.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::core::config::data::path_display;
use crate::core::config::McpServer;
use crate::core::message::{Conversation, Message};
use crate::core::providers::ProviderConfig;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No conversation to export - the chat history is empty.")]
    Empty,

    #[error("File '{}' already exists. Choose a different file name.", path_display(.0))]
    Exists(PathBuf),

    #[error("Failed to access {}: {source}", path_display(.path))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid chat export: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedSettings {
    pub llm_provider: String,
    pub model: String,
    pub temperature: f64,
    #[serde(default)]
    pub mcp_servers: Vec<McpServer>,
}

impl ExportedSettings {
    pub fn from_provider_config(config: &ProviderConfig, mcp_servers: &[McpServer]) -> Self {
        Self {
            llm_provider: config.provider.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            mcp_servers: mcp_servers.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatExport {
    pub exported: DateTime<Utc>,
    pub settings: ExportedSettings,
    pub messages: Vec<Message>,
}

impl ChatExport {
    pub fn new(settings: ExportedSettings, messages: &[Message]) -> Self {
        Self {
            exported: Utc::now(),
            settings,
            messages: messages.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_conversation(self) -> Conversation {
        Conversation::from(self.messages)
    }

    /// `chat-export-YYYY-MM-DD.json` for the given day.
    pub fn default_file_name(date: NaiveDate) -> String {
        format!("chat-export-{}.json", date.format("%Y-%m-%d"))
    }

    /// Write the export to `path`. Existing files are only replaced when
    /// `overwrite` is set.
    pub fn write_to_path(&self, path: &Path, overwrite: bool) -> Result<(), ExportError> {
        if self.messages.is_empty() {
            return Err(ExportError::Empty);
        }
        if !overwrite && path.exists() {
            return Err(ExportError::Exists(path.to_path_buf()));
        }

        let io_err = |source: std::io::Error| ExportError::Io {
            path: path.to_path_buf(),
            source,
        };
        let contents = self.to_json()?;
        let mut temp_file = match path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new_in("."),
        }
        .map_err(io_err)?;

        temp_file.write_all(contents.as_bytes()).map_err(io_err)?;
        temp_file.write_all(b"\n").map_err(io_err)?;
        temp_file.persist(path).map_err(|err| io_err(err.error))?;
        Ok(())
    }

    pub fn read_from_path(path: &Path) -> Result<Self, ExportError> {
        let contents = fs::read_to_string(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn settings() -> ExportedSettings {
        ExportedSettings {
            llm_provider: "anthropic".to_string(),
            model: "claude-3-haiku-20240307".to_string(),
            temperature: 0.7,
            mcp_servers: vec![McpServer {
                id: "files".to_string(),
                name: "Files".to_string(),
                url: "http://localhost:3001".to_string(),
                enabled: true,
            }],
        }
    }

    fn sample_messages() -> Vec<Message> {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap();
        vec![
            Message::at(Role::User, "What's a monad?", t0),
            Message::at(Role::Assistant, "A monoid in the category of endofunctors.", t1),
        ]
    }

    #[test]
    fn export_then_import_preserves_messages() {
        let export = ChatExport::new(settings(), &sample_messages());
        let json = export.to_json().unwrap();
        let imported = ChatExport::from_json(&json).unwrap();

        assert_eq!(imported, export);
        assert_eq!(imported.into_conversation().messages(), sample_messages());
    }

    #[test]
    fn settings_use_camel_case_and_omit_credentials() {
        let config = ProviderConfig::new("openai", "gpt-4", "sk-secret").with_temperature(0.7);
        let settings = ExportedSettings::from_provider_config(&config, &[]);
        let json = ChatExport::new(settings, &sample_messages()).to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["settings"]["llmProvider"], "openai");
        assert_eq!(value["settings"]["model"], "gpt-4");
        assert_eq!(value["settings"]["temperature"], 0.7);
        assert!(value["settings"]["mcpServers"].as_array().unwrap().is_empty());
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["timestamp"], "2024-03-01T09:30:00Z");
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn write_and_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.json");
        let export = ChatExport::new(settings(), &sample_messages());

        export.write_to_path(&path, false).unwrap();
        let loaded = ChatExport::read_from_path(&path).unwrap();
        assert_eq!(loaded, export);

        let err = export.write_to_path(&path, false).unwrap_err();
        assert!(matches!(err, ExportError::Exists(_)));
        assert!(err.to_string().contains("already exists"));
        export.write_to_path(&path, true).unwrap();
    }

    #[test]
    fn empty_conversations_are_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        let err = ChatExport::new(settings(), &[])
            .write_to_path(&path, false)
            .unwrap_err();

        assert!(matches!(err, ExportError::Empty));
        assert!(!path.exists());
    }

    #[test]
    fn malformed_imports_are_rejected() {
        assert!(matches!(
            ChatExport::from_json("{\"messages\": []}"),
            Err(ExportError::Json(_))
        ));
        let bad_role = r#"{"exported":"2024-03-01T09:30:00Z",
            "settings":{"llmProvider":"openai","model":"gpt-4","temperature":1.0},
            "messages":[{"role":"system","content":"x","timestamp":"2024-03-01T09:30:00Z"}]}"#;
        assert!(ChatExport::from_json(bad_role).is_err());

        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            ChatExport::read_from_path(&missing),
            Err(ExportError::Io { .. })
        ));
    }

    #[test]
    fn default_file_name_uses_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            ChatExport::default_file_name(date),
            "chat-export-2024-03-01.json"
        );
    }
}
