//! Persisted credential storage for n8ncli.
//!
//! Connection settings live in a single JSON file, `~/.n8ncli.json`:
//!
//! ```json
//! {
//!   "host": "https://n8n.example.com/api/v1",
//!   "apiKey": "n8n_api_..."
//! }
//! ```
//!
//! Both keys are optional; a missing file is a valid "nothing persisted"
//! state. The file contains a secret, so it is written with 0600
//! permissions (owner read/write only) and loads emit a warning when the
//! mode is more permissive than that.
//!
//! A corrupt file never aborts a command: loading degrades to an empty
//! record with a warning on stderr, so `config set` can always repair it.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;

/// Name of the persisted config file, placed in the user's home directory.
pub const CONFIG_FILENAME: &str = ".n8ncli.json";

/// Environment variable overriding the directory that holds the config
/// file. Used by the test suite to keep runs isolated from `$HOME`.
pub const CONFIG_DIR_ENV: &str = "N8NCLI_CONFIG_DIR";

/// Required permissions for the config file (Unix: 0600, owner read/write only).
#[cfg(unix)]
pub const CONFIG_FILE_MODE: u32 = 0o600;

/// Connection settings as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedConfig {
    /// Base URL of the n8n API (including the /api/v1 path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// API key (sensitive!)
    #[serde(rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl PersistedConfig {
    /// Create an empty record with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the record from parsed JSON, field by field.
    ///
    /// A value of the wrong type (e.g. a numeric `host`) is treated as
    /// absent rather than stringified or rejected wholesale.
    fn from_value(value: &serde_json::Value) -> Self {
        let string_field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };
        Self {
            host: string_field("host"),
            api_key: string_field("apiKey"),
        }
    }
}

/// Result of checking the config file's access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionCheck {
    /// Whether group and other have no access bits set
    pub secure: bool,
    /// The raw mode bits (lower 9), if the file exists
    pub mode: Option<u32>,
}

/// Handle to the persisted config file.
///
/// The path is computed fresh on construction, so each command sees the
/// current process environment. `at()` injects an explicit path for tests.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Open the store at the default location
    /// (`$N8NCLI_CONFIG_DIR/.n8ncli.json`, falling back to the home directory).
    pub fn new() -> Self {
        Self { path: config_path() }
    }

    /// Open the store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the persisted config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted config from disk.
    ///
    /// A missing file yields an empty record. A file that exists but does
    /// not parse yields an empty record plus a warning on stderr; wrong-typed
    /// fields are dropped individually. Never fails.
    pub fn load(&self) -> PersistedConfig {
        if !self.path.exists() {
            return PersistedConfig::new();
        }

        let check = self.check_permissions();
        if !check.secure {
            if let Some(mode) = check.mode {
                eprintln!(
                    "Warning: config file {} has permissions {:03o}, which are too open.",
                    self.path.display(),
                    mode
                );
                eprintln!("It is recommended that your config file is NOT accessible by others.");
                eprintln!("Run: chmod 600 {}", self.path.display());
            }
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                eprintln!(
                    "Warning: config file {} could not be read: {}",
                    self.path.display(),
                    err
                );
                return PersistedConfig::new();
            }
        };

        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(value) => PersistedConfig::from_value(&value),
            Err(_) => {
                eprintln!(
                    "Warning: config file {} contains invalid JSON",
                    self.path.display()
                );
                PersistedConfig::new()
            }
        }
    }

    /// Check whether the config file's access mode excludes group/other.
    ///
    /// A missing file is vacuously secure. On non-Unix platforms the check
    /// always passes.
    pub fn check_permissions(&self) -> PermissionCheck {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            match fs::metadata(&self.path) {
                Ok(metadata) => {
                    let mode = metadata.permissions().mode() & 0o777;
                    PermissionCheck {
                        secure: mode & 0o077 == 0,
                        mode: Some(mode),
                    }
                }
                Err(_) => PermissionCheck {
                    secure: true,
                    mode: None,
                },
            }
        }
        #[cfg(not(unix))]
        {
            PermissionCheck {
                secure: true,
                mode: None,
            }
        }
    }

    /// Write the given record to disk as pretty JSON with a trailing
    /// newline, restricted to owner read/write.
    pub fn save(&self, config: &PersistedConfig) -> Result<()> {
        let content = serde_json::to_string_pretty(config)? + "\n";

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            use std::os::unix::fs::PermissionsExt;

            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(CONFIG_FILE_MODE)
                .open(&self.path)?;
            file.write_all(content.as_bytes())?;
            // mode() only applies at creation; tighten pre-existing files too
            fs::set_permissions(&self.path, fs::Permissions::from_mode(CONFIG_FILE_MODE))?;
        }
        #[cfg(not(unix))]
        fs::write(&self.path, content)?;

        Ok(())
    }

    /// Set a single value, preserving the other field.
    ///
    /// Read-modify-write with no locking; concurrent invocations from two
    /// processes race with last-writer-wins.
    pub fn set(&self, key: ConfigKey, value: &str) -> Result<()> {
        let mut current = self.load();
        match key {
            ConfigKey::Host => current.host = Some(value.to_string()),
            ConfigKey::ApiKey => current.api_key = Some(value.to_string()),
        }
        self.save(&current)
    }

    /// Delete the persisted config file.
    ///
    /// Returns `true` if a file was removed, `false` if there was nothing
    /// to clear.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        Ok(true)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the config file path from the current process environment.
pub fn config_path() -> PathBuf {
    let dir = env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(CONFIG_FILENAME)
}

/// Mask an API key for display.
///
/// Keys of 12 characters or fewer are fully redacted; longer keys show the
/// first 8 and last 4 characters only.
pub fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= 12 {
        return "***".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Validate that a host string is an absolute URL.
///
/// Any scheme the URL grammar allows is accepted; bare hostnames and empty
/// strings are rejected.
pub fn validate_host(host: &str) -> std::result::Result<(), String> {
    match Url::parse(host) {
        Ok(_) => Ok(()),
        Err(_) => Err("Invalid URL format".to_string()),
    }
}

/// Canonical configuration keys, parsed from user-supplied aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Host,
    ApiKey,
}

impl ConfigKey {
    /// Parse a user-supplied key name, case-insensitive.
    ///
    /// Accepts `host`/`n8nhost` and `apikey`/`n8nkey`; anything else is an
    /// error naming the rejected input and the valid keys.
    pub fn parse(key: &str) -> std::result::Result<Self, String> {
        match key.to_lowercase().as_str() {
            "host" | "n8nhost" => Ok(ConfigKey::Host),
            "apikey" | "n8nkey" => Ok(ConfigKey::ApiKey),
            _ => Err(format!(
                "Unknown config key: {}. Valid keys: host, apikey",
                key
            )),
        }
    }

    /// Canonical field name as it appears in the config file.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Host => "host",
            ConfigKey::ApiKey => "apiKey",
        }
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
