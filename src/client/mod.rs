//! Client boundary types
//!
//! The crate instruments any HTTP client that exposes three lifecycle
//! registration points: before-request, after-response, and on-error. This
//! module defines the request/response shapes those hooks receive and the
//! [`HookClient`] trait the installer wires into.
//!
//! The important design point is the extensions slot on [`Request`]: it is the
//! sole channel that carries the active span context from the before-request
//! hook to whichever finalizing hook runs. The transport in between must pass
//! the request value through untouched.

use http::{Extensions, HeaderMap, Method, StatusCode, Version};
use url::Url;

/// Error surfaced by the client's transport to the error hook.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Hook invoked before a request is handed to the transport.
///
/// May mutate headers (trace context injection) and the extensions slot.
pub type BeforeRequestHook = Box<dyn Fn(&mut Request) + Send + Sync>;

/// Hook invoked after a response has been received.
pub type AfterResponseHook = Box<dyn Fn(&Response) + Send + Sync>;

/// Hook invoked when the transport fails instead of producing a response.
pub type ErrorHook = Box<dyn Fn(&Request, &TransportError) + Send + Sync>;

/// Registration surface of an instrumentable HTTP client.
///
/// Registration is append-only: hooks installed here run after any hooks the
/// application already registered, and installing tracing never clears an
/// existing chain.
pub trait HookClient {
    /// Append a hook that runs before each request is sent.
    fn on_before_request(&mut self, hook: BeforeRequestHook);

    /// Append a hook that runs after each successful response.
    fn on_after_response(&mut self, hook: AfterResponseHook);

    /// Append a hook that runs when the transport reports an error.
    fn on_error(&mut self, hook: ErrorHook);
}

/// An outgoing HTTP request as seen by the lifecycle hooks.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    extensions: Extensions,
}

impl Request {
    /// Create a request with empty headers and an empty extensions slot.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            extensions: Extensions::new(),
        }
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full request URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable request headers. The before-request hook writes propagation
    /// headers here.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Per-request extensions: the correlation slot that round-trips with the
    /// request through the transport.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to the extensions slot.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// The User-Agent header value, if present and non-empty.
    pub fn user_agent(&self) -> Option<&str> {
        self.headers
            .get(http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }

    /// Declared request body size, parsed from the Content-Length header.
    pub fn content_length(&self) -> Option<u64> {
        parse_content_length(&self.headers)
    }
}

/// A completed HTTP exchange: the response plus the request that produced it.
///
/// Owning the request is what lets the after-response hook recover the span
/// context written by the before-request hook.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    request: Request,
}

impl Response {
    /// Assemble a response around its originating request.
    pub fn new(status: StatusCode, version: Version, headers: HeaderMap, request: Request) -> Self {
        Self {
            status,
            version,
            headers,
            request,
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Negotiated protocol version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request this response answers, including its extensions slot.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Response body size, parsed from the Content-Length header.
    pub fn content_length(&self) -> Option<u64> {
        parse_content_length(&self.headers)
    }
}

fn parse_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
