//! Connection settings for the remote platform.
//!
//! Resolution order for every field: explicit builder value, then the
//! `N8N_*` environment variable, then the built-in default.
//! [`ClientConfig::from_env`] also reads a `.env` file from the working
//! directory (or its parents); process variables win over the file.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::ClientError;

pub const DEFAULT_API_KEY: &str = "n8n-api-key";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5678;
pub const DEFAULT_PROTOCOL: &str = "http";
pub const DEFAULT_BASE_PATH: &str = "/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ENV_PREFIX: &str = "N8N_";

/// Fully resolved settings used to construct a [`crate::Client`].
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    /// Scheme, host, port and base path, without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Resolve everything from the process environment, a `.env` file if
    /// one is found, and defaults.
    pub fn from_env() -> Result<Self, ClientError> {
        let file = match dotenv::dotenv_iter() {
            Ok(iter) => collect_env_file(iter)?,
            Err(_) => HashMap::new(),
        };
        Self::builder().build_with(layered(file))
    }

    /// Like [`from_env`](Self::from_env) but with an explicit env file,
    /// which must exist.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let iter = dotenv::from_path_iter(path)
            .map_err(|e| ClientError::Config(format!("cannot read env file {}: {e}", path.display())))?;
        let file = collect_env_file(iter)?;
        debug!(path = %path.display(), entries = file.len(), "loaded env file");
        Self::builder().build_with(layered(file))
    }
}

fn collect_env_file<I>(iter: I) -> Result<HashMap<String, String>, ClientError>
where
    I: Iterator<Item = dotenv::Result<(String, String)>>,
{
    iter.collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| ClientError::Config(format!("malformed env file: {e}")))
}

/// Process environment first, then values read from an env file.
fn layered(file: HashMap<String, String>) -> impl Fn(&str) -> Option<String> {
    move |key| std::env::var(key).ok().or_else(|| file.get(key).cloned())
}

/// Collects explicit overrides before resolution.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    protocol: Option<String>,
    base_path: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Full base URL; when set, host/port/protocol/base path are ignored.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ClientConfig, ClientError> {
        self.build_with(|key| std::env::var(key).ok())
    }

    /// Resolve using `env` in place of the process environment.
    ///
    /// `env` receives full variable names such as `N8N_HOST`.
    pub fn build_with<E>(self, env: E) -> Result<ClientConfig, ClientError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let lookup = |field: &str| {
            env(&format!("{ENV_PREFIX}{field}")).filter(|v| !v.trim().is_empty())
        };

        let api_key = self
            .api_key
            .or_else(|| lookup("API_KEY"))
            .unwrap_or_else(|| DEFAULT_API_KEY.to_string());

        let timeout = match self.timeout {
            Some(t) => t,
            None => match lookup("TIMEOUT_SECS") {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ClientError::Config(format!("N8N_TIMEOUT_SECS is not a number: {raw}")))?,
                None => DEFAULT_TIMEOUT,
            },
        };

        let base_url = match self.base_url.or_else(|| lookup("BASE_URL")) {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let protocol = self
                    .protocol
                    .or_else(|| lookup("PROTOCOL"))
                    .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string());
                let host = self
                    .host
                    .or_else(|| lookup("HOST"))
                    .unwrap_or_else(|| DEFAULT_HOST.to_string());
                let port = match self.port {
                    Some(p) => p,
                    None => match lookup("PORT") {
                        Some(raw) => raw
                            .trim()
                            .parse::<u16>()
                            .map_err(|_| ClientError::Config(format!("N8N_PORT is not a valid port: {raw}")))?,
                        None => DEFAULT_PORT,
                    },
                };
                let base_path = self
                    .base_path
                    .or_else(|| lookup("BASE_PATH"))
                    .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());

                compose_base_url(&protocol, &host, port, &base_path)
            }
        };

        debug!(%base_url, timeout_ms = timeout.as_millis() as u64, "resolved client configuration");

        Ok(ClientConfig {
            api_key,
            base_url,
            timeout,
        })
    }
}

fn compose_base_url(protocol: &str, host: &str, port: u16, base_path: &str) -> String {
    let path = base_path.trim_matches('/');
    if path.is_empty() {
        format!("{protocol}://{host}:{port}")
    } else {
        format!("{protocol}://{host}:{port}/{path}")
    }
}

// ============================================================
// Unit tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = ClientConfig::builder().build_with(env_of(&[])).unwrap();
        assert_eq!(cfg.api_key, "n8n-api-key");
        assert_eq!(cfg.base_url, "http://localhost:5678/api/v1");
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn environment_overrides_defaults() {
        let env = env_of(&[
            ("N8N_API_KEY", "from-env"),
            ("N8N_HOST", "n8n.internal"),
            ("N8N_PORT", "443"),
            ("N8N_PROTOCOL", "https"),
            ("N8N_BASE_PATH", "/api/v2/"),
            ("N8N_TIMEOUT_SECS", "3"),
        ]);
        let cfg = ClientConfig::builder().build_with(env).unwrap();
        assert_eq!(cfg.api_key, "from-env");
        assert_eq!(cfg.base_url, "https://n8n.internal:443/api/v2");
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn explicit_values_beat_environment() {
        let env = env_of(&[("N8N_API_KEY", "from-env"), ("N8N_PORT", "1234")]);
        let cfg = ClientConfig::builder()
            .api_key("explicit")
            .port(9999)
            .build_with(env)
            .unwrap();
        assert_eq!(cfg.api_key, "explicit");
        assert_eq!(cfg.base_url, "http://localhost:9999/api/v1");
    }

    #[test]
    fn base_url_replaces_composed_parts() {
        let cfg = ClientConfig::builder()
            .host("ignored")
            .base_url("http://127.0.0.1:40000/api/v1/")
            .build_with(env_of(&[]))
            .unwrap();
        assert_eq!(cfg.base_url, "http://127.0.0.1:40000/api/v1");
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = ClientConfig::builder()
            .build_with(env_of(&[("N8N_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn env_file_values_are_used() {
        let path = std::env::temp_dir().join(format!("rusty-n8n-client-{}.env", std::process::id()));
        std::fs::write(
            &path,
            "# connection\nN8N_BASE_URL=http://files.example:5999/api/v1\nN8N_TIMEOUT_SECS=7\n",
        )
        .unwrap();

        let cfg = ClientConfig::from_env_file(&path);
        std::fs::remove_file(&path).unwrap();
        let cfg = cfg.unwrap();
        assert_eq!(cfg.base_url, "http://files.example:5999/api/v1");
        assert_eq!(cfg.timeout, Duration::from_secs(7));
    }

    #[test]
    fn missing_env_file_is_a_config_error() {
        let err = ClientConfig::from_env_file("/definitely/not/here/.env").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn api_key_is_redacted_in_debug_output() {
        let cfg = ClientConfig::builder()
            .api_key("super-secret")
            .build_with(env_of(&[]))
            .unwrap();
        assert!(!format!("{cfg:?}").contains("super-secret"));
    }
}
