//! A scripted transport for exercising commands against `ApiClient`.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use {
    async_trait::async_trait,
    mmctl_client::{ApiClient, ApiRequest, RawResponse, Result, Transport},
};

/// Answers from a queue of `(status, body)` pairs and records each request.
///
/// An exhausted queue answers `404`.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    requests: Mutex<Vec<ApiRequest>>,
    replies: Mutex<VecDeque<(u16, String)>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reply(&self, status: u16, body: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back((status, body.to_owned()));
        self
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect()
    }

    pub(crate) fn last(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        let (status, body) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| (404, String::new()));
        Ok(RawResponse {
            status,
            body: body.into(),
            ..RawResponse::default()
        })
    }
}

pub(crate) fn api_client(transport: &Arc<ScriptedTransport>) -> ApiClient {
    ApiClient::new(transport.clone())
}
