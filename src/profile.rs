//! Provider profile: the host layout and editor-identification constants the
//! Copilot endpoint expects.
//!
//! A built-in default matches the current VS Code Copilot Chat extension;
//! profiles can also be loaded from YAML so version bumps do not need a
//! rebuild:
//!
//! ```yaml
//! plugin_version: "0.27.0"
//! api_version: "2025-05-01"
//! base_url: "http://127.0.0.1:4010"   # optional, pins every account kind to one host
//! ```

use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::session::AccountKind;
use crate::{Error, ErrorContext, Result};

static DEFAULT_PROFILE: Lazy<ProviderProfile> = Lazy::new(ProviderProfile::builtin);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderProfile {
    /// Explicit API host. When unset the host is derived from the account kind.
    pub base_url: Option<String>,
    pub chat_completions_path: String,
    pub integration_id: String,
    pub plugin_version: String,
    pub api_version: String,
    pub openai_intent: String,
    pub user_agent_library: String,
}

impl Default for ProviderProfile {
    fn default() -> Self {
        DEFAULT_PROFILE.clone()
    }
}

impl ProviderProfile {
    fn builtin() -> Self {
        Self {
            base_url: None,
            chat_completions_path: "/chat/completions".to_string(),
            integration_id: "vscode-chat".to_string(),
            plugin_version: "0.26.7".to_string(),
            api_version: "2025-04-01".to_string(),
            openai_intent: "conversation-panel".to_string(),
            user_agent_library: "electron-fetch".to_string(),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let profile: ProviderProfile = serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid provider profile: {}", e),
                ErrorContext::new().with_source("profile_loader"),
            )
        })?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(base) = &self.base_url {
            Url::parse(base).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid base_url '{}': {}", base, e),
                    ErrorContext::new()
                        .with_field_path("profile.base_url")
                        .with_source("profile_loader"),
                )
            })?;
        }
        if !self.chat_completions_path.starts_with('/') {
            return Err(Error::configuration_with_context(
                "chat_completions_path must start with '/'",
                ErrorContext::new()
                    .with_field_path("profile.chat_completions_path")
                    .with_details(self.chat_completions_path.clone()),
            ));
        }
        for (field, value) in [
            ("profile.plugin_version", &self.plugin_version),
            ("profile.api_version", &self.api_version),
            ("profile.integration_id", &self.integration_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::configuration_with_context(
                    "value must not be empty",
                    ErrorContext::new().with_field_path(field),
                ));
            }
        }
        Ok(())
    }

    /// API host for `kind`, without a trailing slash.
    pub fn base_url_for(&self, kind: AccountKind) -> String {
        if let Some(base) = &self.base_url {
            return base.trim_end_matches('/').to_string();
        }
        match kind {
            AccountKind::Individual => "https://api.githubcopilot.com".to_string(),
            other => format!("https://api.{}.githubcopilot.com", other.as_str()),
        }
    }

    /// Full chat-completions URL for `kind`.
    pub fn chat_completions_url(&self, kind: AccountKind) -> Result<Url> {
        let raw = format!("{}{}", self.base_url_for(kind), self.chat_completions_path);
        Url::parse(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid chat-completions URL '{}': {}", raw, e),
                ErrorContext::new().with_field_path("profile.base_url"),
            )
        })
    }

    pub fn editor_plugin_version(&self) -> String {
        format!("copilot-chat/{}", self.plugin_version)
    }

    pub fn user_agent(&self) -> String {
        format!("GitHubCopilotChat/{}", self.plugin_version)
    }
}
