//! Connection-setting resolution with source tracking.
//!
//! Each field is resolved independently through a fixed precedence chain:
//!
//! 1. CLI flag (`--host` / `--api-key`)
//! 2. Environment variable (`N8N_HOST` / `N8N_API_KEY`)
//! 3. Persisted config file (`~/.n8ncli.json`)
//!
//! An empty string at any level falls through to the next, so an
//! accidentally-empty flag cannot mask a valid environment variable.
//! Environment variables are read fresh at resolution time, never cached.

use std::env;

use crate::config::store::ConfigStore;
use crate::{Error, Result};

/// Environment variable for the n8n host URL.
pub const HOST_ENV: &str = "N8N_HOST";

/// Environment variable for the n8n API key.
pub const API_KEY_ENV: &str = "N8N_API_KEY";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from a CLI flag
    Cli,
    /// Value from an environment variable
    Env,
    /// Value from the persisted config file
    File,
    /// No source provided a value
    Missing,
}

impl ConfigSource {
    /// String form used in JSON output and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Cli => "cli",
            ConfigSource::Env => "env",
            ConfigSource::File => "file",
            ConfigSource::Missing => "missing",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CLI flag values passed into resolution.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Host override from `--host`
    pub host: Option<String>,
    /// API key override from `--api-key`
    pub api_key: Option<String>,
}

impl CliOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host override.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the API key override.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Environment variable values captured at resolution time.
#[derive(Debug, Clone, Default)]
pub struct EnvValues {
    pub host: Option<String>,
    pub api_key: Option<String>,
}

impl EnvValues {
    /// Capture the relevant variables from the process environment.
    pub fn capture() -> Self {
        Self {
            host: env::var(HOST_ENV).ok(),
            api_key: env::var(API_KEY_ENV).ok(),
        }
    }
}

/// Fully resolved configuration with source tags.
///
/// Invariant: a field is the empty string if and only if its source is
/// [`ConfigSource::Missing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub host: String,
    pub api_key: String,
    pub host_source: ConfigSource,
    pub api_key_source: ConfigSource,
}

impl ResolvedConfig {
    /// Require both fields to be present, producing client-ready settings.
    ///
    /// A missing host is reported before a missing API key.
    pub fn require(self) -> Result<ApiConfig> {
        if self.host.is_empty() {
            return Err(Error::MissingHost);
        }
        if self.api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }
        Ok(ApiConfig {
            host: self.host,
            api_key: self.api_key,
        })
    }
}

/// Connection settings guaranteed complete, ready to construct a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: String,
    pub api_key: String,
}

/// Resolve one field through the precedence chain.
fn resolve_field(
    cli: Option<&str>,
    env: Option<&str>,
    file: Option<&str>,
) -> (String, ConfigSource) {
    let candidates = [
        (cli, ConfigSource::Cli),
        (env, ConfigSource::Env),
        (file, ConfigSource::File),
    ];
    for (value, source) in candidates {
        if let Some(value) = value {
            if !value.is_empty() {
                return (value.to_string(), source);
            }
        }
    }
    (String::new(), ConfigSource::Missing)
}

/// Resolve configuration against explicit environment values.
///
/// This is the injection seam for tests; production callers go through
/// [`resolve_config`], which captures the real process environment.
pub fn resolve_with_env(
    store: &ConfigStore,
    overrides: &CliOverrides,
    env: &EnvValues,
) -> ResolvedConfig {
    let persisted = store.load();

    let (host, host_source) = resolve_field(
        overrides.host.as_deref(),
        env.host.as_deref(),
        persisted.host.as_deref(),
    );
    let (api_key, api_key_source) = resolve_field(
        overrides.api_key.as_deref(),
        env.api_key.as_deref(),
        persisted.api_key.as_deref(),
    );

    ResolvedConfig {
        host,
        api_key,
        host_source,
        api_key_source,
    }
}

/// Resolve configuration from all three sources. Never fails; unresolved
/// fields come back empty with a `missing` source tag.
pub fn resolve_config(store: &ConfigStore, overrides: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(store, overrides, &EnvValues::capture())
}

/// Strict resolution for commands that talk to the API: both fields must
/// resolve, or the missing one is reported as a configuration error.
pub fn load_config(store: &ConfigStore, overrides: &CliOverrides) -> Result<ApiConfig> {
    resolve_config(store, overrides).require()
}
