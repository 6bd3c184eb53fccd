//! The seam between the API client and the wire.
//!
//! [`ApiClient`](crate::ApiClient) describes each call as an [`ApiRequest`] and
//! hands it to a [`Transport`]. [`HttpTransport`] sends it with `reqwest`; tests
//! substitute a recording fake.

use std::time::{Duration, Instant};

use {
    async_trait::async_trait,
    bytes::Bytes,
    futures::{StreamExt, stream::BoxStream},
    mmctl_config::ServerConfig,
    reqwest::{Client, header::HeaderMap},
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, warn},
    url::Url,
};

use crate::{
    error::{Context, Result},
    request::{ApiRequest, Body},
};

/// Path prefix of every REST route.
pub const API_URL_SUFFIX: &str = "/api/v4";

const DEFAULT_USER_AGENT: &str = concat!("mmctl-rs/", env!("CARGO_PKG_VERSION"));

pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// A fully buffered HTTP answer.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// An HTTP answer whose body is consumed chunk by chunk.
pub struct StreamingResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

impl StreamingResponse {
    /// Drain the body into memory.
    pub async fn into_raw(self) -> Result<RawResponse> {
        let mut body = Vec::new();
        let mut stream = self.body;
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk?);
        }
        Ok(RawResponse {
            status: self.status,
            headers: self.headers,
            body: Bytes::from(body),
        })
    }
}

/// Executes API requests. Any status code is a successful execution here;
/// interpreting failure statuses is the client's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;

    /// Execute and hand back the body as a stream.
    ///
    /// The default buffers through [`Transport::execute`].
    async fn execute_streaming(&self, request: ApiRequest) -> Result<StreamingResponse> {
        let raw = self.execute(request).await?;
        let body = raw.body;
        Ok(StreamingResponse {
            status: raw.status,
            headers: raw.headers,
            body: futures::stream::once(async move { Ok(body) }).boxed(),
        })
    }
}

/// Tunables for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub user_agent: String,
    pub accept_invalid_certs: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.into(),
            accept_invalid_certs: false,
        }
    }
}

/// `reqwest`-backed transport sharing one pooled connection set across calls.
pub struct HttpTransport {
    client: Client,
    api_root: String,
    token: Option<Secret<String>>,
}

impl HttpTransport {
    pub fn new(server_url: &str, token: Option<Secret<String>>) -> Result<Self> {
        Self::with_options(server_url, token, TransportOptions::default())
    }

    pub fn with_options(
        server_url: &str,
        token: Option<Secret<String>>,
        options: TransportOptions,
    ) -> Result<Self> {
        let parsed = Url::parse(server_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(crate::Error::message(format!(
                "unsupported server URL scheme '{}'",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            api_root: format!("{}{API_URL_SUFFIX}", server_url.trim_end_matches('/')),
            token,
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let options = TransportOptions {
            timeout: Duration::from_secs(config.timeout_secs),
            user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.into()),
            accept_invalid_certs: config.insecure_skip_verify,
        };
        Self::with_options(&config.url, config.token.clone(), options)
    }

    /// Absolute URL prefix for API routes, e.g. `https://chat.example.com/api/v4`.
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn build(&self, request: ApiRequest) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.api_root, request.path);
        let mut builder = self.client.request(request.method, url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Text(text) => builder.body(text),
            Body::Bytes(bytes) => builder.body(bytes),
            Body::Multipart(multipart) => {
                let part = reqwest::multipart::Part::bytes(multipart.data.to_vec())
                    .file_name(multipart.file_name);
                let mut form = reqwest::multipart::Form::new().part(multipart.file_field, part);
                for (key, value) in multipart.fields {
                    form = form.text(key, value);
                }
                builder.multipart(form)
            },
        }
    }

    async fn send(&self, request: ApiRequest) -> Result<reqwest::Response> {
        let method = request.method.clone();
        let path = request.path.clone();
        debug!(%method, %path, "api request");

        let started = Instant::now();
        let resp = self.build(request).send().await.inspect_err(|e| {
            warn!(%method, %path, error = %e, "api request failed before a response");
        })?;

        let status = resp.status().as_u16();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if status >= 400 {
            warn!(%method, %path, status, elapsed_ms, "api request returned failure status");
        } else {
            debug!(%method, %path, status, elapsed_ms, "api response");
        }
        Ok(resp)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let resp = self.send(request).await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    async fn execute_streaming(&self, request: ApiRequest) -> Result<StreamingResponse> {
        let resp = self.send(request).await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(crate::Error::from))
            .boxed();
        Ok(StreamingResponse {
            status,
            headers,
            body,
        })
    }
}
