//! Shared fixtures for the client integration tests.
#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use {
    async_trait::async_trait,
    bytes::Bytes,
    mmctl_client::{ApiClient, ApiRequest, RawResponse, Result, Transport},
    reqwest::header::{HeaderMap, HeaderName, HeaderValue},
};

/// Records every request and answers from a queue of canned responses.
#[derive(Default)]
pub struct FakeTransport {
    requests: Mutex<Vec<ApiRequest>>,
    replies: Mutex<VecDeque<Result<RawResponse>>>,
}

impl FakeTransport {
    pub fn reply(&self, reply: Result<RawResponse>) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn last(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(raw(200, "null")))
    }
}

pub fn raw(status: u16, body: &str) -> RawResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-request-id"),
        HeaderValue::from_static("req-1"),
    );
    headers.insert(
        HeaderName::from_static("x-version-id"),
        HeaderValue::from_static("9.0.0"),
    );
    RawResponse {
        status,
        headers,
        body: Bytes::from(body.to_string()),
    }
}

pub fn client() -> (Arc<FakeTransport>, ApiClient) {
    let fake = Arc::new(FakeTransport::default());
    let client = ApiClient::new(fake.clone());
    (fake, client)
}
