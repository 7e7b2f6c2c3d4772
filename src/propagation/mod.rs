//! Trace context propagation over HTTP headers
//!
//! Bridges `http::HeaderMap` to the OpenTelemetry propagation traits so a
//! `TextMapPropagator` can write (and tests can read back) W3C Trace Context
//! headers on an outgoing request.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry::{global, Context};

/// Mutable header carrier used when injecting trace context into a request.
pub struct HeaderCarrier<'a>(pub &'a mut HeaderMap);

impl Injector for HeaderCarrier<'_> {
    fn set(&mut self, key: &str, value: String) {
        // Propagators only emit valid header names; a value the header type
        // rejects is dropped rather than breaking the request.
        if let Ok(name) = HeaderName::from_bytes(key.as_bytes()) {
            if let Ok(value) = HeaderValue::from_str(&value) {
                self.0.insert(name, value);
            }
        }
    }
}

/// Read-only header view used when extracting trace context from headers.
pub struct HeaderExtractor<'a>(pub &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Inject `cx` into `headers` using the configured propagator, falling back to
/// the process-global propagator when no override is configured.
pub(crate) fn inject_context(
    propagator: Option<&(dyn TextMapPropagator + Send + Sync)>,
    cx: &Context,
    headers: &mut HeaderMap,
) {
    let mut carrier = HeaderCarrier(headers);
    match propagator {
        Some(propagator) => propagator.inject_context(cx, &mut carrier),
        None => global::get_text_map_propagator(|propagator| {
            propagator.inject_context(cx, &mut carrier)
        }),
    }
}
