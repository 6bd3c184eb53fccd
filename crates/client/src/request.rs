//! Transport-neutral description of one API call.

use {bytes::Bytes, reqwest::Method, serde::Serialize};

use crate::{error::Result, response::HEADER_ETAG_CLIENT};

/// A multipart upload with one file part and optional plain fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartBody {
    pub file_field: String,
    pub file_name: String,
    pub data: Bytes,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    Text(String),
    Bytes(Bytes),
    Multipart(MultipartBody),
}

/// Method, route, query, headers and body of a request against the API root.
///
/// `path` is relative to `/api/v4` and always starts with `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append `page` and `per_page` exactly as given.
    #[must_use]
    pub fn paged(self, page: u32, per_page: u32) -> Self {
        self.query("page", page).query("per_page", per_page)
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Make the request conditional on `etag`; empty or absent tags are ignored.
    #[must_use]
    pub fn etag(self, etag: Option<&str>) -> Self {
        match etag {
            Some(tag) if !tag.is_empty() => self.header(HEADER_ETAG_CLIENT, tag),
            _ => self,
        }
    }

    pub fn json(mut self, body: &impl Serialize) -> Result<Self> {
        self.body = Body::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    #[must_use]
    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// First query value for `key`, if present.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First header value for `name`, compared case-insensitively.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Encode one caller-supplied identifier for use as a path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
