use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: String,
    pub create_at: i64,
    pub update_at: i64,
    pub edit_at: i64,
    pub delete_at: i64,
    pub is_pinned: bool,
    pub user_id: String,
    pub channel_id: String,
    pub root_id: String,
    pub original_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub post_type: String,
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub props: serde_json::Map<String, serde_json::Value>,
    pub hashtags: String,
    #[serde(
        deserialize_with = "crate::nullable::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub file_ids: Vec<String>,
    pub pending_post_id: String,
    pub reply_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Ordered page of posts; `order` holds ids newest first, `posts` the bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostList {
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub order: Vec<String>,
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub posts: HashMap<String, Post>,
    pub next_post_id: String,
    pub prev_post_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_next: Option<bool>,
}

impl PostList {
    /// Posts in `order` sequence, skipping ids with no matching body.
    pub fn ordered(&self) -> impl Iterator<Item = &Post> {
        self.order.iter().filter_map(|id| self.posts.get(id))
    }
}
