//! Connection settings for `mmctl`: discovery, loading, env overrides and validation.
//!
//! Config files: `mmctl.toml`, `mmctl.yaml`, `mmctl.yml` or `mmctl.json`,
//! searched in `./` then the user config directory.
//!
//! `${ENV_VAR}` references in the file are expanded before parsing.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{
        ENV_TIMEOUT_SECS, ENV_TOKEN, ENV_URL, apply_env_overrides, config_dir, discover_and_load,
        find_config_file, find_or_default_config_path, load_config, save_config, save_config_to,
    },
    schema::{DEFAULT_TIMEOUT_SECS, MmctlConfig, ServerConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate, validate_config},
};
