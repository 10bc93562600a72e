use crate::client::core::RequestShaper;
use crate::profile::ProviderProfile;
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating shapers with custom configuration.
///
/// Keep this surface area small and predictable.
#[derive(Default)]
pub struct RequestShaperBuilder {
    transport: Option<Arc<dyn Transport>>,
    profile: Option<ProviderProfile>,
    profile_path: Option<PathBuf>,
    /// Override base URL (primarily for testing with mock servers)
    base_url_override: Option<String>,
    timeout: Option<Duration>,
}

impl RequestShaperBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject the network boundary. Default is an [`HttpTransport`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use an explicit provider profile instead of the built-in one.
    pub fn profile(mut self, profile: ProviderProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Load the provider profile from a YAML file at build time.
    pub fn profile_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.profile_path = Some(path.into());
        self
    }

    /// Override the API host for every account kind.
    ///
    /// Can also be set via `COPILOT_BASE_URL`.
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Request timeout for the default transport (ignored with a custom transport).
    ///
    /// Can also be set via `COPILOT_HTTP_TIMEOUT_SECS`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the shaper.
    pub fn build(self) -> Result<RequestShaper> {
        let mut profile = match (self.profile, self.profile_path) {
            (Some(profile), _) => profile,
            (None, Some(path)) => ProviderProfile::from_file(path)?,
            (None, None) => ProviderProfile::default(),
        };

        let base_url = self
            .base_url_override
            .or_else(|| std::env::var("COPILOT_BASE_URL").ok())
            .filter(|s| !s.trim().is_empty());
        if let Some(base_url) = base_url {
            profile.base_url = Some(base_url);
        }
        profile.validate()?;

        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::with_timeout(self.timeout)?),
        };

        Ok(RequestShaper {
            transport,
            profile: Arc::new(profile),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AccountKind;

    #[test]
    fn base_url_override_is_validated() {
        let err = RequestShaperBuilder::new()
            .base_url_override("::not a url::")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, crate::Error::Configuration { .. }));
    }

    #[test]
    fn base_url_override_applies_to_profile() {
        let shaper = RequestShaperBuilder::new()
            .base_url_override("http://127.0.0.1:9")
            .build()
            .unwrap();
        assert_eq!(
            shaper.profile().base_url_for(AccountKind::Business),
            "http://127.0.0.1:9"
        );
    }
}
