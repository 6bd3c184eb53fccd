//! Typed async client for a team-collaboration server's REST API (v4).
//!
//! [`Client`] is the capability contract; [`ApiClient`] implements it over a
//! pluggable [`Transport`], normally [`HttpTransport`].

pub mod api;
pub mod error;
pub mod request;
pub mod response;
pub mod traits;
pub mod transport;

pub use {
    api::ApiClient,
    error::{Context, Error, Result},
    request::{ApiRequest, Body, MultipartBody},
    response::Response,
    traits::{ApiResult, Client, DownloadWriter, UploadReader},
    transport::{
        API_URL_SUFFIX, ByteStream, HttpTransport, RawResponse, StreamingResponse, Transport,
        TransportOptions,
    },
};
