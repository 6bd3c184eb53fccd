use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::MmctlConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["mmctl.toml", "mmctl.yaml", "mmctl.yml", "mmctl.json"];

pub const ENV_URL: &str = "MMCTL_URL";
pub const ENV_TOKEN: &str = "MMCTL_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "MMCTL_TIMEOUT_SECS";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<MmctlConfig> {
    let raw = read_substituted(path)?;
    parse_config(&raw, path)
}

/// Load the config file as an untyped tree, after env substitution.
pub fn load_config_value(path: &Path) -> anyhow::Result<serde_json::Value> {
    let raw = read_substituted(path)?;
    parse_config_value(&raw, path)
}

fn read_substituted(path: &Path) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    Ok(substitute_env(&raw))
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./mmctl.{toml,yaml,yml,json}`
/// 2. the user config directory (e.g. `~/.config/mmctl/`)
///
/// Returns `MmctlConfig::default()` if no file is found or it fails to parse.
pub fn discover_and_load() -> MmctlConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    MmctlConfig::default()
}

/// First existing config file in the working directory, then the user config dir.
pub fn find_config_file() -> Option<PathBuf> {
    let mut dirs = vec![PathBuf::from(".")];
    dirs.extend(config_dir());
    find_config_file_in(&dirs)
}

fn find_config_file_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)))
        .find(|p| p.exists())
}

/// The user-global config directory.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "mmctl").map(|d| d.config_dir().to_path_buf())
}

/// Returns the path of an existing config file, or the default TOML path.
pub fn find_or_default_config_path() -> PathBuf {
    if let Some(path) = find_config_file() {
        return path;
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mmctl.toml")
}

/// Write `config` to the discovered (or default) config path.
pub fn save_config(config: &MmctlConfig) -> anyhow::Result<PathBuf> {
    let path = find_or_default_config_path();
    save_config_to(config, &path)?;
    Ok(path)
}

/// Write `config` to `path` in the format implied by its extension.
///
/// Creates parent directories if needed.
pub fn save_config_to(config: &MmctlConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let text = match extension(path) {
        "toml" => toml::to_string_pretty(config)
            .map_err(|e| anyhow::anyhow!("serialize config: {e}"))?,
        "yaml" | "yml" => serde_yaml::to_string(config)?,
        "json" => serde_json::to_string_pretty(config)?,
        ext => anyhow::bail!("unsupported config format: .{ext}"),
    };
    std::fs::write(path, text)?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}

/// Overlay `MMCTL_URL`, `MMCTL_TOKEN` and `MMCTL_TIMEOUT_SECS` onto `config`.
pub fn apply_env_overrides(config: MmctlConfig) -> MmctlConfig {
    apply_env_overrides_with(config, |name| std::env::var(name).ok())
}

pub(crate) fn apply_env_overrides_with(
    mut config: MmctlConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> MmctlConfig {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(url) = non_empty(ENV_URL) {
        config.server.url = url;
    }
    if let Some(token) = non_empty(ENV_TOKEN) {
        config.server.token = Some(Secret::new(token));
    }
    if let Some(raw) = non_empty(ENV_TIMEOUT_SECS) {
        match raw.parse::<u64>() {
            Ok(secs) => config.server.timeout_secs = secs,
            Err(e) => warn!(var = ENV_TIMEOUT_SECS, value = %raw, error = %e, "ignoring invalid timeout"),
        }
    }
    config
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("toml")
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<MmctlConfig> {
    match extension(path) {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        ext => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

fn parse_config_value(raw: &str, path: &Path) -> anyhow::Result<serde_json::Value> {
    match extension(path) {
        "toml" => {
            let v: toml::Value = toml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "yaml" | "yml" => {
            let v: serde_yaml::Value = serde_yaml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "json" => Ok(serde_json::from_str(raw)?),
        ext => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
