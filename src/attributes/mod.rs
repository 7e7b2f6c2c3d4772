//! HTTP semantic-convention attributes and span naming
//!
//! Pure functions mapping a request or response to span attributes, following
//! the OpenTelemetry semantic conventions for HTTP clients:
//!
//! | Attribute | Example |
//! |-----------|---------|
//! | `http.method` | `GET` |
//! | `http.url` | `https://example.com/items` |
//! | `http.user_agent` | `aws-sdk-rust/1.0` |
//! | `http.status_code` | `204` |
//! | `http.flavor` | `1.1` |
//! | `http.request_content_length` | `1024` |
//! | `http.response_content_length` | `0` |
//! | `net.peer.name` | `example.com` |
//! | `net.peer.port` | `8443` |

use http::Version;
use opentelemetry::{Key, KeyValue};

use crate::client::{Request, Response};

pub(crate) const HTTP_METHOD: Key = Key::from_static_str("http.method");
pub(crate) const HTTP_URL: Key = Key::from_static_str("http.url");
pub(crate) const HTTP_USER_AGENT: Key = Key::from_static_str("http.user_agent");
pub(crate) const HTTP_STATUS_CODE: Key = Key::from_static_str("http.status_code");
pub(crate) const HTTP_FLAVOR: Key = Key::from_static_str("http.flavor");
pub(crate) const HTTP_REQUEST_CONTENT_LENGTH: Key =
    Key::from_static_str("http.request_content_length");
pub(crate) const HTTP_RESPONSE_CONTENT_LENGTH: Key =
    Key::from_static_str("http.response_content_length");
pub(crate) const NET_PEER_NAME: Key = Key::from_static_str("net.peer.name");
pub(crate) const NET_PEER_PORT: Key = Key::from_static_str("net.peer.port");

/// Attributes known at span start: URL (unless hidden), method, and the
/// User-Agent header when present.
pub fn start_attributes(req: &Request, hide_url: bool) -> Vec<KeyValue> {
    let mut attributes = Vec::with_capacity(3);
    if !hide_url {
        attributes.push(KeyValue::new(HTTP_URL, req.url().to_string()));
    }
    attributes.push(KeyValue::new(HTTP_METHOD, req.method().to_string()));
    if let Some(agent) = req.user_agent() {
        attributes.push(KeyValue::new(HTTP_USER_AGENT, agent.to_string()));
    }
    attributes
}

/// Full client-request attribute set, computed once the request is complete.
pub fn request_attributes(req: &Request, hide_url: bool) -> Vec<KeyValue> {
    let mut attributes = start_attributes(req, hide_url);
    if let Some(host) = req.url().host_str() {
        attributes.push(KeyValue::new(NET_PEER_NAME, host.to_string()));
    }
    // Only explicit ports are reported; scheme defaults stay implicit.
    if let Some(port) = req.url().port() {
        attributes.push(KeyValue::new(NET_PEER_PORT, port as i64));
    }
    if let Some(len) = req.content_length() {
        attributes.push(KeyValue::new(HTTP_REQUEST_CONTENT_LENGTH, len as i64));
    }
    attributes
}

/// Client-response attribute set: status code, protocol version, and body size
/// when declared.
pub fn response_attributes(res: &Response) -> Vec<KeyValue> {
    let mut attributes = vec![KeyValue::new(
        HTTP_STATUS_CODE,
        res.status().as_u16() as i64,
    )];
    if let Some(flavor) = http_flavor(res.version()) {
        attributes.push(KeyValue::new(HTTP_FLAVOR, flavor));
    }
    if let Some(len) = res.content_length() {
        attributes.push(KeyValue::new(HTTP_RESPONSE_CONTENT_LENGTH, len as i64));
    }
    attributes
}

/// Default span name: the HTTP method.
pub fn default_span_name(req: &Request, _is_error: bool) -> String {
    req.method().to_string()
}

fn http_flavor(version: Version) -> Option<&'static str> {
    match version {
        Version::HTTP_09 => Some("0.9"),
        Version::HTTP_10 => Some("1.0"),
        Version::HTTP_11 => Some("1.1"),
        Version::HTTP_2 => Some("2.0"),
        Version::HTTP_3 => Some("3.0"),
        _ => None,
    }
}
