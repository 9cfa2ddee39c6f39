//! Centralized configuration (environment variables + defaults).
//!
//! Every accessor takes a lookup function so the same parsing runs against
//! the process environment in the binaries and against fixed maps in tests.
//! Firebase variables are also accepted with the `VITE_` prefix used by the
//! web build of the application.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Reads a variable, falling back to its `VITE_`-prefixed form. Blank values count as unset.
fn lookup_var<F>(lookup: &F, name: &'static str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .or_else(|| lookup(&format!("VITE_{}", name)))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_var<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup_var(lookup, name).ok_or(ConfigError::Missing(name))
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Web-app credentials of the Firebase project plus REST client settings.
#[derive(Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: Option<String>,
    pub project_id: String,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub measurement_id: Option<String>,
    pub database_id: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl FirebaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match lookup_var(&lookup, "FIRESTORE_TIMEOUT_SECS") {
            Some(v) => v.parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: "FIRESTORE_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key: require_var(&lookup, "API_KEY")?,
            auth_domain: lookup_var(&lookup, "AUTH_DOMAIN"),
            project_id: require_var(&lookup, "PROJECT_ID")?,
            storage_bucket: lookup_var(&lookup, "STORAGE_BUCKET"),
            messaging_sender_id: lookup_var(&lookup, "MESSAGING_SENDER_ID"),
            app_id: lookup_var(&lookup, "APP_ID"),
            measurement_id: lookup_var(&lookup, "MEASUREMENT_ID"),
            database_id: lookup_var(&lookup, "FIRESTORE_DATABASE")
                .unwrap_or_else(|| "(default)".to_string()),
            endpoint: lookup_var(&lookup, "FIRESTORE_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_FIRESTORE_ENDPOINT.to_string()),
            timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }

    /// The API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let visible: String = self
            .api_key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{}", visible)
    }
}

impl fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &self.masked_api_key())
            .field("auth_domain", &self.auth_domain)
            .field("project_id", &self.project_id)
            .field("storage_bucket", &self.storage_bucket)
            .field("messaging_sender_id", &self.messaging_sender_id)
            .field("app_id", &self.app_id)
            .field("measurement_id", &self.measurement_id)
            .field("database_id", &self.database_id)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Which document store backs the material collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore(FirebaseConfig),
    Postgres { database_url: String },
    Memory,
}

impl StoreBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Firestore(_) => "firestore",
            Self::Postgres { .. } => "postgres",
            Self::Memory => "memory",
        }
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = lookup_var(&lookup, "STORE_BACKEND")
            .unwrap_or_else(|| "firestore".to_string())
            .to_lowercase();
        match kind.as_str() {
            "firestore" => Ok(Self::Firestore(FirebaseConfig::from_lookup(lookup)?)),
            "postgres" => Ok(Self::Postgres {
                database_url: require_var(&lookup, "DATABASE_URL")?,
            }),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid {
                var: "STORE_BACKEND",
                reason: format!("unknown backend `{}` (expected firestore, postgres or memory)", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Everything the binaries need, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store: StoreBackend,
    pub base_url: String,
    pub listen_addr: SocketAddr,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_raw = lookup_var(&lookup, "LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_raw.parse().map_err(|_| ConfigError::Invalid {
            var: "LISTEN_ADDR",
            reason: format!("`{}` is not a socket address", listen_raw),
        })?;

        let log_format = match lookup_var(&lookup, "LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    reason: format!("`{}` (expected text or json)", other),
                })
            }
        };

        Ok(Self {
            store: StoreBackend::from_lookup(&lookup)?,
            base_url: lookup_var(&lookup, "BASE_URL").unwrap_or_else(|| "/".to_string()),
            listen_addr,
            log_level: lookup_var(&lookup, "LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
        })
    }
}
