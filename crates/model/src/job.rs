use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const JOB_STATUS_PENDING: &str = "pending";
pub const JOB_STATUS_IN_PROGRESS: &str = "in_progress";
pub const JOB_STATUS_SUCCESS: &str = "success";
pub const JOB_STATUS_ERROR: &str = "error";
pub const JOB_STATUS_CANCEL_REQUESTED: &str = "cancel_requested";
pub const JOB_STATUS_CANCELED: &str = "canceled";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub id: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub priority: i64,
    pub create_at: i64,
    pub start_at: i64,
    pub last_activity_at: i64,
    pub status: String,
    pub progress: i64,
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub data: HashMap<String, String>,
}

impl Job {
    /// Whether the job has reached a state it will not leave.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status.as_str(),
            JOB_STATUS_SUCCESS | JOB_STATUS_ERROR | JOB_STATUS_CANCELED
        )
    }
}
