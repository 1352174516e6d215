//! Client configuration with validation.
//!
//! A config is built once and then shared read-only by every request the
//! client makes. Host and port are derived from the TLS flag and the
//! optional cluster / overrides.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default API host when no cluster or host override is given
pub const DEFAULT_HOST: &str = "api.pusherapp.com";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment variable holding a full `http(s)://key:secret@host/apps/<id>` URL
pub const ENV_URL: &str = "PUSHER_URL";
pub const ENV_APP_ID: &str = "PUSHER_APP_ID";
pub const ENV_KEY: &str = "PUSHER_KEY";
pub const ENV_SECRET: &str = "PUSHER_SECRET";
pub const ENV_CLUSTER: &str = "PUSHER_CLUSTER";

/// Pusher application credentials and endpoint settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PusherConfig {
    pub app_id: String,
    pub key: String,
    pub secret: String,
    /// Use HTTPS
    #[serde(default = "default_ssl")]
    pub ssl: bool,
    /// Cluster name, e.g. `eu` or `mt1`
    #[serde(default)]
    pub cluster: Option<String>,
    /// Explicit host; wins over `cluster`
    #[serde(default)]
    pub host: Option<String>,
    /// Explicit port; otherwise 443 / 80 depending on `ssl`
    #[serde(default)]
    pub port: Option<u16>,
    /// Per-request timeout handed to the HTTP transport
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

fn default_ssl() -> bool {
    true
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for PusherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PusherConfig")
            .field("app_id", &self.app_id)
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("ssl", &self.ssl)
            .field("cluster", &self.cluster)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PusherConfig {
    /// Create a config with HTTPS on the default host.
    pub fn new(
        app_id: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            key: key.into(),
            secret: secret.into(),
            ssl: true,
            cluster: None,
            host: None,
            port: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse `http(s)://<key>:<secret>@<host>[:port]/apps/<app_id>`.
    pub fn from_url(raw: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;

        let ssl = match parsed.scheme() {
            "https" => true,
            "http" => false,
            other => {
                return Err(ConfigError::InvalidUrl(format!(
                    "unsupported scheme {other:?}"
                )))
            }
        };

        let key = parsed.username();
        let secret = parsed
            .password()
            .ok_or_else(|| ConfigError::InvalidUrl("missing secret".into()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::InvalidUrl("missing host".into()))?;

        let app_id = match parsed.path_segments().map(|s| s.collect::<Vec<_>>()) {
            Some(segments) if segments.len() == 2 && segments[0] == "apps" => segments[1],
            _ => {
                return Err(ConfigError::InvalidUrl(format!(
                    "expected path /apps/<app_id>, got {:?}",
                    parsed.path()
                )))
            }
        };

        let mut config = Self::new(app_id, key, secret)
            .with_ssl(ssl)
            .with_host(host);
        config.port = parsed.port();
        config.validate()?;
        Ok(config)
    }

    /// Load from `PUSHER_URL`, or from `PUSHER_APP_ID`, `PUSHER_KEY`,
    /// `PUSHER_SECRET` and optional `PUSHER_CLUSTER`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(ENV_URL) {
            return Self::from_url(&url);
        }

        let required = |name: &str| lookup(name).ok_or_else(|| ConfigError::MissingEnv(name.into()));
        let mut config = Self::new(
            required(ENV_APP_ID)?,
            required(ENV_KEY)?,
            required(ENV_SECRET)?,
        );
        config.cluster = lookup(ENV_CLUSTER);
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_id.is_empty() {
            return Err(ConfigError::MissingField("app_id"));
        }
        if self.key.is_empty() {
            return Err(ConfigError::MissingField("key"));
        }
        if self.secret.is_empty() {
            return Err(ConfigError::MissingField("secret"));
        }
        Ok(())
    }

    /// Effective API host
    pub fn effective_host(&self) -> String {
        match (&self.host, &self.cluster) {
            (Some(host), _) => host.clone(),
            (None, Some(cluster)) => format!("api-{cluster}.pusher.com"),
            (None, None) => DEFAULT_HOST.to_string(),
        }
    }

    /// Effective API port
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(if self.ssl { 443 } else { 80 })
    }

    pub fn scheme(&self) -> &'static str {
        if self.ssl {
            "https"
        } else {
            "http"
        }
    }

    /// Base URL for API requests, e.g. `https://api-eu.pusher.com:443`
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}",
            self.scheme(),
            self.effective_host(),
            self.effective_port()
        )
    }
}
