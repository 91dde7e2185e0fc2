//! Service configuration.
//!
//! Read from a TOML file (every field has a default), with `${VAR}` values
//! expanded from the environment and the `PORT`, `REDIS_URL` and
//! `JWT_SECRET` variables taking precedence over the file.

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::validators::is_redis_url;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "courthub.toml";

/// Longest accepted session token lifetime.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Redis,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            url: default_redis_url(),
            prefix: default_prefix(),
        }
    }
}

fn default_redis_url() -> String {
    "${REDIS_URL}".to_string()
}

fn default_prefix() -> String {
    "courthub".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_days: default_token_ttl_days(),
        }
    }
}

fn default_jwt_secret() -> String {
    "${JWT_SECRET}".to_string()
}

fn default_token_ttl_days() -> i64 {
    30
}

impl HubConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    /// Reads `path`, or `courthub.toml` in the working directory when present,
    /// or falls back to defaults. The result is resolved against the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::read_file(path)?,
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::read_file(&fallback)?
                } else {
                    Self::default()
                }
            }
        };
        config.resolve(|name| std::env::var(name).ok())
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Applies environment overrides and `${VAR}` expansion through `lookup`,
    /// then validates the result.
    pub fn resolve<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?;
        }
        if let Some(url) = lookup("REDIS_URL") {
            self.storage.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }

        if self.storage.backend == Backend::Redis {
            self.storage.url = expand(&self.storage.url, &lookup).context("storage.url")?;
        }
        self.auth.jwt_secret = expand(&self.auth.jwt_secret, &lookup).context("auth.jwt_secret")?;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.backend == Backend::Redis && !is_redis_url(&self.storage.url) {
            bail!("storage.url must be a redis:// or rediss:// URL, got {:?}", self.storage.url);
        }
        if self.storage.prefix.trim().is_empty() {
            bail!("storage.prefix must not be empty");
        }
        if self.auth.jwt_secret.is_empty() {
            bail!("auth.jwt_secret must not be empty");
        }
        if self.auth.token_ttl_days <= 0 || self.auth.token_ttl_days > MAX_TOKEN_TTL_DAYS {
            bail!(
                "auth.token_ttl_days must be between 1 and {MAX_TOKEN_TTL_DAYS}, got {}",
                self.auth.token_ttl_days
            );
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.server.host, self.server.port))
    }
}

/// Replaces a whole-value `${VAR}` reference with the variable's value.
fn expand<F>(value: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match value.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        Some(name) => lookup(name).with_context(|| format!("Environment variable {name} not set")),
        None => Ok(value.to_string()),
    }
}
