//! Client metadata taken from request headers

use axum::http::{header, HeaderMap, HeaderName};

use crate::signal_store::NOT_AVAILABLE;

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Typed view over the headers a signal needs
pub struct RequestMeta<'a> {
    headers: &'a HeaderMap,
}

impl<'a> RequestMeta<'a> {
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self { headers }
    }

    /// Header value as a string, `None` when absent or blank.
    ///
    /// Bytes outside visible ASCII are decoded lossily instead of dropping
    /// the header, so UTF-8 user agents survive.
    pub fn header(&self, name: &HeaderName) -> Option<String> {
        let value = self.headers.get(name)?;
        let decoded = String::from_utf8_lossy(value.as_bytes());
        let trimmed = decoded.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// First hop of `x-forwarded-for`
    pub fn client_ip(&self) -> Option<String> {
        let forwarded = self.header(&X_FORWARDED_FOR)?;
        let first = forwarded.split(',').next()?.trim();
        (!first.is_empty()).then(|| first.to_string())
    }

    pub fn user_agent(&self) -> Option<String> {
        self.header(&header::USER_AGENT)
    }

    pub fn client_ip_or_unavailable(&self) -> String {
        self.client_ip()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn user_agent_or_unavailable(&self) -> String {
        self.user_agent()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}
