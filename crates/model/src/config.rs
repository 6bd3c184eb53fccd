//! Server configuration document.
//!
//! The server's configuration schema is large and version dependent, so it is
//! kept as a JSON object. Callers address settings by dotted path, e.g.
//! `ServiceSettings.SiteURL`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(pub serde_json::Map<String, serde_json::Value>);

impl Config {
    /// Look up a setting by dotted path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&serde_json::Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.0.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Set a setting by dotted path, creating intermediate sections.
    ///
    /// Returns `false` when a non-object value sits on the path.
    pub fn set(&mut self, path: &str, value: serde_json::Value) -> bool {
        let mut parts: Vec<&str> = path.split('.').collect();
        let Some(leaf) = parts.pop() else {
            return false;
        };
        let mut current = &mut self.0;
        for part in parts {
            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            match entry.as_object_mut() {
                Some(obj) => current = obj,
                None => return false,
            }
        }
        current.insert(leaf.to_string(), value);
        true
    }
}
