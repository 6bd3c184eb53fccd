use serde::{Deserialize, Serialize};

/// Plugin manifest as returned after install or upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub homepage_url: String,
    pub support_url: String,
    pub release_notes_url: String,
    pub icon_path: String,
    pub version: String,
    pub min_server_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webapp: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<serde_json::Map<String, serde_json::Value>>,
}

/// An installed plugin's manifest plus its activation details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginInfo {
    #[serde(flatten)]
    pub manifest: Manifest,
    pub state: i32,
}

/// Installed plugins split by activation state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsResponse {
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub active: Vec<PluginInfo>,
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub inactive: Vec<PluginInfo>,
}

impl PluginsResponse {
    /// Look up an installed plugin by id, active or not.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&PluginInfo> {
        self.active
            .iter()
            .chain(self.inactive.iter())
            .find(|p| p.manifest.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplacePlugin {
    pub homepage_url: String,
    pub icon_data: String,
    pub download_url: String,
    pub release_notes_url: String,
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub labels: Vec<serde_json::Value>,
    pub hosting: String,
    pub author_type: String,
    pub release_stage: String,
    pub enterprise: bool,
    pub signature: String,
    pub manifest: Option<Manifest>,
    pub installed_version: String,
    pub updated_at: i64,
}

/// Filter for the marketplace listing; every field maps to a query parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplacePluginFilter {
    pub page: u32,
    pub per_page: u32,
    pub filter: String,
    pub server_version: String,
    pub enterprise_plugins: bool,
    pub cloud: bool,
    pub local_only: bool,
    pub platform: String,
    pub plugin_id: String,
    pub return_all_versions: bool,
}

impl MarketplacePluginFilter {
    /// Query parameters in the form the server expects; empty strings are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];
        let text = [
            ("filter", &self.filter),
            ("server_version", &self.server_version),
            ("platform", &self.platform),
            ("plugin_id", &self.plugin_id),
        ];
        for (key, value) in text {
            if !value.is_empty() {
                pairs.push((key.to_string(), value.clone()));
            }
        }
        let flags = [
            ("enterprise_plugins", self.enterprise_plugins),
            ("cloud", self.cloud),
            ("local_only", self.local_only),
            ("return_all_versions", self.return_all_versions),
        ];
        for (key, value) in flags {
            if value {
                pairs.push((key.to_string(), "true".to_string()));
            }
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallMarketplacePluginRequest {
    pub id: String,
    pub version: String,
}
