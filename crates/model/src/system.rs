use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerBusyState {
    pub busy: bool,
    /// Expiry as unix seconds.
    pub expires: i64,
    /// Expiry as an RFC 3339 timestamp.
    pub expires_ts: String,
}

/// Orphaned-record report for one parent/child table pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationalIntegrityCheckData {
    pub parent_name: String,
    pub child_name: String,
    pub parent_id_attr: String,
    pub child_id_attr: String,
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub records: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityCheckResult {
    pub data: Option<RelationalIntegrityCheckData>,
    pub err: Option<serde_json::Value>,
}
