use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::avatar_fetcher::FetchError;
use crate::signal_store::SignalStoreError;

/// Everything that can stop an avatar request from producing an image.
///
/// Responses only carry a fixed message; the wrapped error is for logs.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("missing email or refId")]
    MissingParams,
    #[error("failed to record signal: {0}")]
    Signal(#[from] SignalStoreError),
    #[error("failed to fetch avatar: {0}")]
    Fetch(#[from] FetchError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingParams => StatusCode::BAD_REQUEST,
            ProxyError::Signal(_) | ProxyError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::MissingParams => "Missing email or refId",
            ProxyError::Signal(_) => "Error adding signal",
            ProxyError::Fetch(_) => "Error fetching image",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.public_message(),
        )
            .into_response()
    }
}
