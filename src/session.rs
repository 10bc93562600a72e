//! Explicit per-call session context.
//!
//! The credential, editor version and account kind are owned by whoever
//! manages the token lifecycle; the shaper only borrows them for the duration
//! of one call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, ErrorContext};

/// Copilot subscription kind; selects the API host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    #[default]
    Individual,
    Business,
    Enterprise,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::Individual => "individual",
            AccountKind::Business => "business",
            AccountKind::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(AccountKind::Individual),
            "business" => Ok(AccountKind::Business),
            "enterprise" => Ok(AccountKind::Enterprise),
            other => Err(Error::configuration_with_context(
                format!("unknown account kind '{}'", other),
                ErrorContext::new()
                    .with_field_path("session.account_kind")
                    .with_details("expected one of: individual, business, enterprise"),
            )),
        }
    }
}

/// Read-only inputs the dispatcher needs from the session owner.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Short-lived Copilot bearer token.
    pub credential: String,
    /// Editor version reported as `editor-version: vscode/<tag>`.
    pub client_version_tag: String,
    pub account_kind: AccountKind,
}

impl SessionContext {
    pub fn new(
        credential: impl Into<String>,
        client_version_tag: impl Into<String>,
        account_kind: AccountKind,
    ) -> Self {
        Self {
            credential: credential.into(),
            client_version_tag: client_version_tag.into(),
            account_kind,
        }
    }

    /// Reject a context that cannot authenticate anything.
    pub fn ensure_credential(&self) -> crate::Result<()> {
        if self.credential.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "Copilot token not found",
                ErrorContext::new()
                    .with_field_path("session.credential")
                    .with_source("session_context"),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("credential", &"<redacted>")
            .field("client_version_tag", &self.client_version_tag)
            .field("account_kind", &self.account_kind)
            .finish()
    }
}
