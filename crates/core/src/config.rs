//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the HTTP client and
//! the screens. Nothing below this module reads environment variables while requests are in
//! flight.

use crate::constants::DEFAULT_API_BASE_URL;
use crate::{AdminError, AdminResult};
use reqwest::Url;

fn invalid_url(err: impl std::fmt::Display) -> AdminError {
    AdminError::InvalidUrl(err.to_string())
}

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Url,
}

impl ClientConfig {
    /// Create a new `ClientConfig` from a base URL string.
    ///
    /// The base URL must use `http` or `https`. A trailing `/` is added to the path when missing
    /// so that resource paths are appended rather than replacing the last segment.
    pub fn new(base_url: &str) -> AdminResult<Self> {
        let mut base_url = Url::parse(base_url.trim()).map_err(invalid_url)?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(AdminError::InvalidConfig(format!(
                "base URL must use http or https, got `{}`",
                base_url.scheme()
            )));
        }
        if base_url.cannot_be_a_base() {
            return Err(AdminError::InvalidConfig(
                "base URL cannot be used as a base".into(),
            ));
        }

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of a whole collection, e.g. `http://localhost:8080/bolnice`.
    pub fn collection_url(&self, path: &str) -> AdminResult<Url> {
        self.base_url
            .join(path.trim_matches('/'))
            .map_err(invalid_url)
    }

    /// URL of a single record, e.g. `http://localhost:8080/bolnice/3`.
    pub fn record_url(&self, path: &str, id: impl std::fmt::Display) -> AdminResult<Url> {
        self.base_url
            .join(&format!("{}/{}", path.trim_matches('/'), id))
            .map_err(invalid_url)
    }
}

/// Resolve the client configuration from an optional override value.
///
/// If `value` is `None` or empty/whitespace, the default base URL is used.
pub fn client_config_from_env_value(value: Option<String>) -> AdminResult<ClientConfig> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(url) => ClientConfig::new(&url),
        None => ClientConfig::new(DEFAULT_API_BASE_URL),
    }
}
