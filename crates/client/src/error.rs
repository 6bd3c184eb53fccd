use mmctl_model::AppError;

use crate::response::Response;

/// The single failure channel of every client operation.
///
/// Callers that need to tell failures apart inspect [`Error::response`] for
/// the HTTP status and, on API failures, the server's [`AppError`] body.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    /// The server answered with a failure status.
    #[error("server returned HTTP {}: {}", .response.status_code, describe(.app_error.as_ref()))]
    Api {
        response: Box<Response>,
        app_error: Option<AppError>,
    },
    /// The server answered successfully but the body did not match the expected shape.
    #[error("failed to decode response body (HTTP {}): {source}", .response.status_code)]
    Decode {
        response: Box<Response>,
        #[source]
        source: serde_json::Error,
    },
    #[error("{message}")]
    Message { message: String },
}

fn describe(app_error: Option<&AppError>) -> String {
    match app_error {
        Some(err) => err.to_string(),
        None => "no error details in response body".into(),
    }
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    /// Transport metadata of the failed exchange, when the server answered at all.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Api { response, .. } | Self::Decode { response, .. } => Some(&**response),
            _ => None,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.response().map(|r| r.status_code)
    }

    #[must_use]
    pub fn app_error(&self) -> Option<&AppError> {
        match self {
            Self::Api { app_error, .. } => app_error.as_ref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach a message to a foreign error, collapsing it into [`Error::Message`].
pub trait Context<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx = context.into();
        self.map_err(|source| Error::message(format!("{ctx}: {source}")))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|source| Error::message(format!("{}: {source}", f().into())))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> Box<Response> {
        Box::new(Response {
            status_code: status,
            ..Response::default()
        })
    }

    #[test]
    fn api_error_exposes_status_and_body() {
        let err = Error::Api {
            response: response(403),
            app_error: Some(AppError {
                id: "api.context.permissions.app_error".into(),
                message: "You do not have the appropriate permissions.".into(),
                ..AppError::default()
            }),
        };
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(
            err.app_error().map(|e| e.id.as_str()),
            Some("api.context.permissions.app_error")
        );
        assert!(err.to_string().starts_with("server returned HTTP 403: You do not"));
    }

    #[test]
    fn api_error_without_body() {
        let err = Error::Api {
            response: response(502),
            app_error: None,
        };
        assert_eq!(
            err.to_string(),
            "server returned HTTP 502: no error details in response body"
        );
    }

    #[test]
    fn message_has_no_response() {
        let err = Error::message("boom");
        assert!(err.response().is_none());
        assert!(err.status_code().is_none());
    }

    #[test]
    fn context_prefixes_message() {
        let res: std::result::Result<(), &str> = Err("bad input");
        let err = res.context("parsing").unwrap_err();
        assert_eq!(err.to_string(), "parsing: bad input");
    }
}
