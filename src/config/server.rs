//! HTTP server configuration.
//!
//! Binding, environment, log filter, and the CORS allow-list. Everything
//! here has a working default except `cors_origins`, which stays unset in
//! development (the router falls back to a permissive policy).

use serde::Deserialize;
use std::net::SocketAddr;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind. The default binds every interface so the service
    /// works unchanged inside a container.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port. Deployments firewall everything else.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: Environment,

    /// `tracing` filter directive applied when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-request deadline. Directory pages are served from batched
    /// queries, so anything past this is a stuck backend, not a slow page.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Comma-separated origin allow-list. Unset means permissive CORS.
    pub cors_origins: Option<String>,
}

/// Deployment environment, controlling log format and CORS strictness.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl ServerConfig {
    /// Resolves the bind address from host and port.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ValidationError::InvalidBindAddress)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// The configured CORS origins, split and trimmed. Empty when unset.
    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .as_ref()
            .map(|origins| {
                origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        // A trailing comma or stray whitespace in the origin list would
        // otherwise surface as a CorsLayer panic at startup.
        if self.cors_origins_list().iter().any(|origin| origin.is_empty()) {
            return Err(ValidationError::InvalidCorsOrigin);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info,sleuthdex=debug,sqlx=warn".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
