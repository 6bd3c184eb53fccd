use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadType {
    #[default]
    Attachment,
    Import,
}

/// Server-side state of a resumable upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSession {
    pub id: String,
    #[serde(rename = "type")]
    pub upload_type: UploadType,
    pub create_at: i64,
    pub user_id: String,
    pub channel_id: String,
    pub filename: String,
    pub file_size: i64,
    pub file_offset: i64,
}

impl UploadSession {
    /// Bytes still expected before the upload completes.
    #[must_use]
    pub fn remaining(&self) -> i64 {
        (self.file_size - self.file_offset).max(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInfo {
    pub id: String,
    pub creator_id: String,
    pub post_id: String,
    pub channel_id: String,
    pub create_at: i64,
    pub update_at: i64,
    pub delete_at: i64,
    pub name: String,
    pub extension: String,
    pub size: i64,
    pub mime_type: String,
    pub width: i32,
    pub height: i32,
    pub has_preview_image: bool,
}
