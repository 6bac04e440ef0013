//! Configuration storage and resolution for n8ncli.
//!
//! Two cooperating pieces:
//!
//! ## store - the persisted credential file
//!
//! `~/.n8ncli.json` holds the optional `host` and `apiKey` values. It is
//! written 0600 (it contains a secret), checked for over-permissive modes
//! on every load, and degrades to an empty record when corrupt.
//!
//! ## resolver - effective settings with source tracking
//!
//! Merges CLI flags, `N8N_HOST`/`N8N_API_KEY` environment variables, and
//! the persisted file, per field, tagging each resolved value with its
//! source.
//!
//! ## Precedence
//!
//! CLI flag > environment variable > persisted file. Empty values fall
//! through to the next source.

pub mod resolver;
pub mod store;

pub use resolver::{
    API_KEY_ENV, ApiConfig, CliOverrides, ConfigSource, EnvValues, HOST_ENV, ResolvedConfig,
    load_config, resolve_config, resolve_with_env,
};
pub use store::{
    CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigKey, ConfigStore, PermissionCheck, PersistedConfig,
    config_path, mask_api_key, validate_host,
};
#[cfg(unix)]
pub use store::CONFIG_FILE_MODE;
