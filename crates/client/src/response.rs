//! Transport metadata returned next to every payload.

use reqwest::header::HeaderMap;

pub const HEADER_REQUEST_ID: &str = "X-Request-Id";
pub const HEADER_VERSION_ID: &str = "X-Version-Id";
pub const HEADER_ETAG_SERVER: &str = "Etag";
pub const HEADER_ETAG_CLIENT: &str = "If-None-Match";

/// Status and headers of one exchange with the server.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status_code: u16,
    pub request_id: String,
    pub etag: String,
    pub server_version: String,
    pub headers: HeaderMap,
}

impl Response {
    #[must_use]
    pub fn from_parts(status_code: u16, headers: HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        Self {
            status_code,
            request_id: header(HEADER_REQUEST_ID),
            etag: header(HEADER_ETAG_SERVER),
            server_version: header(HEADER_VERSION_ID),
            headers,
        }
    }

    /// The server confirmed the caller's cached copy is still current.
    #[must_use]
    pub fn is_not_modified(&self) -> bool {
        self.status_code == 304
    }
}
