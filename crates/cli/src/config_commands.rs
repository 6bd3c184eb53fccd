use std::path::{Path, PathBuf};

use {
    anyhow::Result,
    clap::Subcommand,
    mmctl_config::{
        MmctlConfig, Severity,
        validate::{self, Diagnostic},
    },
    mmctl_model::Config,
    secrecy::{ExposeSecret, Secret},
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the local config file and report errors/warnings.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Print the effective connection settings (token redacted).
    Show,
    /// Print the path of the config file in use.
    Path,
    /// Store the server URL (and optionally a token) in the local config file.
    SetServer {
        url: String,
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Read a server setting by dotted path, e.g. `ServiceSettings.SiteURL`.
    Get { key: String },
    /// Change a server setting. `value` is parsed as JSON, falling back to a string.
    Set { key: String, value: String },
    /// Ask the server to reload its configuration from its store.
    Reload,
    /// Copy the server configuration from one store to another.
    Migrate { from: String, to: String },
}

pub async fn handle_config(
    action: ConfigAction,
    config: &MmctlConfig,
    path: Option<&Path>,
    json: bool,
) -> Result<()> {
    match action {
        ConfigAction::Check { verbose } => check(path, verbose),
        ConfigAction::Show => show(config, json),
        ConfigAction::Path => {
            let path = path
                .map(Path::to_path_buf)
                .unwrap_or_else(mmctl_config::find_or_default_config_path);
            println!("{}", path.display());
            Ok(())
        },
        ConfigAction::SetServer {
            url,
            token,
            timeout_secs,
        } => {
            let server = ServerUpdate {
                url,
                token,
                timeout_secs,
            };
            let saved = store_server(path, server)?;
            eprintln!("Saved connection settings to {}.", saved.display());
            Ok(())
        },
        ConfigAction::Get { key } => {
            let client = crate::connect(config)?;
            let (server_config, _) = client.get_config().await?;
            let value = server_config
                .get(&key)
                .ok_or_else(|| anyhow::anyhow!("no setting at '{key}'"))?;
            crate::print_json(value)
        },
        ConfigAction::Set { key, value } => {
            let client = crate::connect(config)?;
            let patch = single_setting(&key, &value)?;
            let (updated, _) = client.patch_config(&patch).await?;
            match updated.get(&key) {
                Some(v) if json => crate::print_json(v),
                Some(v) => {
                    println!("{key} = {v}");
                    Ok(())
                },
                None => anyhow::bail!("server did not keep '{key}'"),
            }
        },
        ConfigAction::Reload => {
            crate::connect(config)?.reload_config().await?;
            eprintln!("Server configuration reloaded.");
            Ok(())
        },
        ConfigAction::Migrate { from, to } => {
            crate::connect(config)?.migrate_config(&from, &to).await?;
            eprintln!("Configuration copied from {from} to {to}.");
            Ok(())
        },
    }
}

struct ServerUpdate {
    url: String,
    token: Option<String>,
    timeout_secs: Option<u64>,
}

/// Merge `update` into the file's settings and write them back.
///
/// Only the file is read, so env and flag overrides are never persisted.
fn store_server(path: Option<&Path>, update: ServerUpdate) -> Result<PathBuf> {
    let existing = match path {
        Some(p) => Some(p.to_path_buf()).filter(|p| p.exists()),
        None => mmctl_config::find_config_file(),
    };
    let mut stored = match &existing {
        Some(p) => mmctl_config::load_config(p)?,
        None => MmctlConfig::default(),
    };

    stored.server.url = update.url;
    if let Some(token) = update.token {
        stored.server.token = Some(Secret::new(token));
    }
    if let Some(secs) = update.timeout_secs {
        stored.server.timeout_secs = secs;
    }

    let result = mmctl_config::validate_config(&stored);
    if let Some(first) = result
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Error)
    {
        anyhow::bail!("{}: {}", first.path, first.message);
    }

    match path {
        Some(p) => {
            mmctl_config::save_config_to(&stored, p)?;
            Ok(p.to_path_buf())
        },
        None => mmctl_config::save_config(&stored),
    }
}

/// A config containing only `key`, ready to send as a patch.
fn single_setting(key: &str, raw: &str) -> Result<Config> {
    let value = serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::from(raw));
    let mut patch = Config::default();
    if key.is_empty() || !patch.set(key, value) {
        anyhow::bail!("invalid setting path '{key}'");
    }
    Ok(patch)
}

fn show(config: &MmctlConfig, json: bool) -> Result<()> {
    let server = &config.server;
    let token = server
        .token
        .as_ref()
        .map(|t| redact(t.expose_secret()));
    if json {
        return crate::print_json(&serde_json::json!({
            "url": server.url,
            "token": token,
            "timeout_secs": server.timeout_secs,
            "user_agent": server.user_agent,
            "insecure_skip_verify": server.insecure_skip_verify,
        }));
    }
    println!("url:                  {}", server.url);
    println!("token:                {}", token.as_deref().unwrap_or("(none)"));
    println!("timeout_secs:         {}", server.timeout_secs);
    if let Some(ua) = &server.user_agent {
        println!("user_agent:           {ua}");
    }
    println!("insecure_skip_verify: {}", server.insecure_skip_verify);
    Ok(())
}

/// Keep the last four characters of long tokens so they can be told apart.
fn redact(token: &str) -> String {
    let count = token.chars().count();
    if count <= 8 {
        return "****".into();
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("****{tail}")
}

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(path: Option<&Path>, verbose: bool) -> Result<()> {
    let result = validate::validate(path);

    if let Some(ref path) = result.config_path {
        eprintln!("Checking {}\n", path.display());
    } else {
        eprintln!("No config file found; checking defaults.\n");
    }

    let shown: Vec<&Diagnostic> = result
        .diagnostics
        .iter()
        .filter(|d| verbose || d.severity != Severity::Info)
        .collect();
    for d in &shown {
        eprintln!("  {}", render(d));
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    if !shown.is_empty() {
        eprintln!();
    }
    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn render(d: &Diagnostic) -> String {
    let color = match d.severity {
        Severity::Error => RED,
        Severity::Warning => YELLOW,
        Severity::Info => CYAN,
    };
    if d.path.is_empty() {
        format!("{BOLD}{color}{}{RESET} {}", d.severity, d.message)
    } else {
        format!("{BOLD}{color}{}{RESET} {}: {}", d.severity, d.path, d.message)
    }
}
