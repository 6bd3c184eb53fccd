//! Configuration checks: unknown keys, unusable server settings and
//! credentials that would travel in clear text.

use std::path::{Path, PathBuf};

use url::Url;

use crate::{loader, schema::MmctlConfig};

const TOP_LEVEL_KEYS: &[&str] = &["server"];
const SERVER_KEYS: &[&str] = &[
    "url",
    "token",
    "timeout_secs",
    "user_agent",
    "insecure_skip_verify",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// One of "syntax", "unknown-field", "server", "security".
    pub category: &'static str,
    /// Dotted path, e.g. "server.url".
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        category: &'static str,
        path: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            path: path.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Validate the file at `path`, or the discovered config file when `None`.
#[must_use]
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let Some(config_path) = path.map(Path::to_path_buf).or_else(loader::find_config_file) else {
        return ValidationResult {
            diagnostics: vec![Diagnostic::new(
                Severity::Info,
                "syntax",
                "",
                "no config file found; using defaults",
            )],
            config_path: None,
        };
    };

    let mut result = ValidationResult {
        config_path: Some(config_path.clone()),
        ..ValidationResult::default()
    };

    match loader::load_config_value(&config_path) {
        Ok(value) => check_unknown_fields(&value, &mut result.diagnostics),
        Err(e) => {
            result
                .diagnostics
                .push(Diagnostic::new(Severity::Error, "syntax", "", e.to_string()));
            return result;
        },
    }

    match loader::load_config(&config_path) {
        Ok(config) => result.diagnostics.extend(validate_config(&config).diagnostics),
        Err(e) => result
            .diagnostics
            .push(Diagnostic::new(Severity::Error, "syntax", "", e.to_string())),
    }
    result
}

/// Semantic checks on an already parsed config.
#[must_use]
pub fn validate_config(config: &MmctlConfig) -> ValidationResult {
    let mut diagnostics = Vec::new();
    let server = &config.server;

    if server.url.trim().is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "server",
            "server.url",
            "server URL is not set (use the config file or MMCTL_URL)",
        ));
    } else {
        match Url::parse(&server.url) {
            Ok(url) if !matches!(url.scheme(), "http" | "https") => {
                diagnostics.push(Diagnostic::new(
                    Severity::Error,
                    "server",
                    "server.url",
                    format!("unsupported URL scheme '{}'", url.scheme()),
                ));
            },
            Ok(url) => {
                if url.scheme() == "http" && server.has_token() {
                    diagnostics.push(Diagnostic::new(
                        Severity::Warning,
                        "security",
                        "server.token",
                        "token will be sent over unencrypted http",
                    ));
                }
                if url.path().trim_end_matches('/').ends_with("/api/v4") {
                    diagnostics.push(Diagnostic::new(
                        Severity::Warning,
                        "server",
                        "server.url",
                        "URL already ends in /api/v4; routes will be doubled",
                    ));
                }
            },
            Err(e) => diagnostics.push(Diagnostic::new(
                Severity::Error,
                "server",
                "server.url",
                format!("invalid URL: {e}"),
            )),
        }
    }

    if server.timeout_secs == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "server",
            "server.timeout_secs",
            "timeout must be at least one second",
        ));
    }

    if server.insecure_skip_verify {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "security",
            "server.insecure_skip_verify",
            "TLS certificate verification is disabled",
        ));
    }

    if !server.has_token() {
        diagnostics.push(Diagnostic::new(
            Severity::Info,
            "server",
            "server.token",
            "no token configured; requests will be unauthenticated",
        ));
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

fn check_unknown_fields(value: &serde_json::Value, diagnostics: &mut Vec<Diagnostic>) {
    let Some(root) = value.as_object() else {
        return;
    };
    for (key, child) in root {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            diagnostics.push(unknown_field(key, key, TOP_LEVEL_KEYS));
            continue;
        }
        if let Some(server) = child.as_object() {
            for name in server.keys() {
                if !SERVER_KEYS.contains(&name.as_str()) {
                    diagnostics.push(unknown_field(&format!("server.{name}"), name, SERVER_KEYS));
                }
            }
        }
    }
}

fn unknown_field(path: &str, key: &str, known: &[&str]) -> Diagnostic {
    let message = match suggest(key, known, 3) {
        Some(hint) => format!("unknown field '{key}' (did you mean '{hint}'?)"),
        None => format!("unknown field '{key}'"),
    };
    Diagnostic::new(Severity::Warning, "unknown-field", path, message)
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, edit_distance(needle, c)))
        .filter(|(_, d)| *d > 0 && *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}
