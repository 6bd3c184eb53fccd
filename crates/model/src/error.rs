use std::fmt;

use serde::{Deserialize, Serialize};

/// Error body the server returns alongside a failure status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppError {
    pub id: String,
    pub message: String,
    pub detailed_error: String,
    pub request_id: String,
    pub status_code: u16,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.id.is_empty() {
            write!(f, " ({})", self.id)?;
        }
        if !self.detailed_error.is_empty() {
            write!(f, ": {}", self.detailed_error)?;
        }
        Ok(())
    }
}
