use crate::request_meta::RequestMeta;
use crate::signal_store::NOT_AVAILABLE;
use axum::http::{header, HeaderMap, HeaderValue};

#[test]
fn test_missing_headers_fall_back_to_not_available() {
    let headers = HeaderMap::new();
    let meta = RequestMeta::new(&headers);

    assert_eq!(meta.client_ip(), None);
    assert_eq!(meta.user_agent(), None);
    assert_eq!(meta.client_ip_or_unavailable(), NOT_AVAILABLE);
    assert_eq!(meta.user_agent_or_unavailable(), NOT_AVAILABLE);
}

#[test]
fn test_client_ip_uses_first_forwarded_hop() {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"),
    );
    let meta = RequestMeta::new(&headers);

    assert_eq!(meta.client_ip().as_deref(), Some("203.0.113.7"));
}

#[test]
fn test_blank_headers_count_as_absent() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("  "));
    headers.insert(header::USER_AGENT, HeaderValue::from_static(""));
    let meta = RequestMeta::new(&headers);

    assert_eq!(meta.client_ip_or_unavailable(), NOT_AVAILABLE);
    assert_eq!(meta.user_agent_or_unavailable(), NOT_AVAILABLE);
}

#[test]
fn test_user_agent_passthrough() {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (X11)"));
    let meta = RequestMeta::new(&headers);

    assert_eq!(meta.user_agent_or_unavailable(), "Mozilla/5.0 (X11)");
}

#[test]
fn test_non_ascii_user_agent_is_kept() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_bytes("Café-Browser/1.0".as_bytes()).unwrap(),
    );
    let meta = RequestMeta::new(&headers);

    assert_eq!(meta.user_agent_or_unavailable(), "Café-Browser/1.0");
}

#[test]
fn test_invalid_utf8_header_is_decoded_lossily() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_bytes(b"Agent\xFF/2").unwrap(),
    );
    let meta = RequestMeta::new(&headers);

    assert_eq!(meta.user_agent_or_unavailable(), "Agent\u{FFFD}/2");
}
