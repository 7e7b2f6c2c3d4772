//! OpenTelemetry lifecycle hooks for HTTP clients
//!
//! Instruments any HTTP client exposing before-request / after-response /
//! on-error registration points with distributed-tracing spans: a span is
//! started before the request goes out, W3C trace context is injected into
//! the outgoing headers, and the span is enriched and ended when the response
//! (or a transport error) arrives.
//!
//! # Features
//!
//! - **Exactly-once span lifecycle**: one span per traced request, ended by
//!   exactly one of the two finalizing hooks
//! - **Context-as-carrier correlation**: the request's extensions slot links
//!   the callbacks; no shared state between in-flight requests
//! - **Semantic-convention attributes** for HTTP client spans
//! - **Configurable**: tracer provider, propagator, skip predicate, span
//!   naming, URL hiding, span start options
//! - **Never breaks traffic**: hooks cannot fail or alter the request beyond
//!   header injection
//!
//! # Example
//!
//! ```no_run
//! use otel_http_hooks::{trace_client, HookClient, TraceConfig};
//!
//! fn setup<C: HookClient>(client: &mut C) {
//!     let config = TraceConfig::builder()
//!         .with_tracer_name("my-service-http")
//!         .with_skipper(|req| req.url().path().starts_with("/health"))
//!         .build();
//!     trace_client(client, config);
//! }
//! ```

pub mod attributes;
pub mod client;
pub mod config;
pub mod hooks;
pub mod propagation;

// Re-export commonly used types
pub use client::{
    AfterResponseHook, BeforeRequestHook, ErrorHook, HookClient, Request, Response, TransportError,
};
pub use config::{
    SpanNameFormatter, SpanStartOption, Skipper, TraceConfig, TraceConfigBuilder,
    DEFAULT_TRACER_NAME,
};
pub use hooks::{active_context, trace_client, ActiveSpan};

/// Library version, reported as the instrumentation scope version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
