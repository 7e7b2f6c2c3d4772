//! Tracing configuration
//!
//! [`TraceConfig`] is built once through [`TraceConfigBuilder`], then shared
//! read-only (behind an `Arc`) by every in-flight request. Every option has a
//! default; no option validates against another.
//!
//! Tracer resolution is two-phase on purpose: the builder only records an
//! override. When no provider override is present, the global provider is
//! looked up at install time, so a provider registered after the config was
//! built but before [`crate::trace_client`] still wins.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::trace::{Span, SpanKind, Tracer, TracerProvider};
use opentelemetry::KeyValue;

use crate::attributes::default_span_name;
use crate::client::Request;

/// Instrumentation scope name reported with spans when no tracer name is
/// configured.
pub const DEFAULT_TRACER_NAME: &str = "otel-http-hooks";

/// Predicate deciding whether a request bypasses tracing entirely.
pub type Skipper = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// Computes the span name from the request; the flag is true on the error
/// path, where no response exists.
pub type SpanNameFormatter = Arc<dyn Fn(&Request, bool) -> String + Send + Sync>;

type TracerSource = Arc<dyn Fn(Cow<'static, str>) -> BoxedTracer + Send + Sync>;

/// A span-creation hint applied, in order, to the span builder before the
/// span is started.
#[derive(Debug, Clone)]
pub enum SpanStartOption {
    /// Span kind (for HTTP clients, typically [`SpanKind::Client`]).
    Kind(SpanKind),
    /// An attribute present from span start, visible to samplers.
    Attribute(KeyValue),
}

/// Resolved, immutable tracing options.
pub struct TraceConfig {
    tracer_source: Option<TracerSource>,
    tracer_name: Cow<'static, str>,
    propagator: Option<Arc<dyn TextMapPropagator + Send + Sync>>,
    span_options: Vec<SpanStartOption>,
    skipper: Skipper,
    span_name_formatter: SpanNameFormatter,
    hide_url: bool,
}

impl TraceConfig {
    /// Start building a config from defaults.
    pub fn builder() -> TraceConfigBuilder {
        TraceConfigBuilder::default()
    }

    /// Resolve the tracer: the configured provider override, or the global
    /// provider as registered at this moment.
    pub(crate) fn tracer(&self) -> BoxedTracer {
        match &self.tracer_source {
            Some(source) => source(self.tracer_name.clone()),
            None => global::tracer_provider().versioned_tracer(
                self.tracer_name.clone(),
                Some(crate::VERSION),
                None::<Cow<'static, str>>,
                None,
            ),
        }
    }

    pub(crate) fn tracer_name(&self) -> &str {
        &self.tracer_name
    }

    pub(crate) fn propagator(&self) -> Option<&(dyn TextMapPropagator + Send + Sync)> {
        self.propagator.as_deref()
    }

    pub(crate) fn span_options(&self) -> &[SpanStartOption] {
        &self.span_options
    }

    pub(crate) fn skip(&self, req: &Request) -> bool {
        (self.skipper)(req)
    }

    pub(crate) fn span_name(&self, req: &Request, is_error: bool) -> String {
        (self.span_name_formatter)(req, is_error)
    }

    pub(crate) fn hide_url(&self) -> bool {
        self.hide_url
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        TraceConfigBuilder::default().build()
    }
}

impl fmt::Debug for TraceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceConfig")
            .field("tracer_name", &self.tracer_name)
            .field("has_tracer_override", &self.tracer_source.is_some())
            .field("has_propagator_override", &self.propagator.is_some())
            .field("span_options", &self.span_options)
            .field("hide_url", &self.hide_url)
            .finish()
    }
}

/// Builder for [`TraceConfig`]; each method sets exactly one field.
pub struct TraceConfigBuilder {
    tracer_source: Option<TracerSource>,
    tracer_name: Cow<'static, str>,
    propagator: Option<Arc<dyn TextMapPropagator + Send + Sync>>,
    span_options: Vec<SpanStartOption>,
    skipper: Skipper,
    span_name_formatter: SpanNameFormatter,
    hide_url: bool,
}

impl Default for TraceConfigBuilder {
    fn default() -> Self {
        Self {
            tracer_source: None,
            tracer_name: Cow::Borrowed(DEFAULT_TRACER_NAME),
            propagator: None,
            span_options: Vec::new(),
            skipper: Arc::new(|_: &Request| false),
            span_name_formatter: Arc::new(default_span_name),
            hide_url: false,
        }
    }
}

impl TraceConfigBuilder {
    /// Override the global tracer provider with `provider`.
    ///
    /// The provider is captured here, but the tracer itself is only created at
    /// install time so it reflects the tracer name in effect then.
    pub fn with_tracer_provider<P, T, S>(mut self, provider: P) -> Self
    where
        P: TracerProvider<Tracer = T> + Send + Sync + 'static,
        T: Tracer<Span = S> + Send + Sync + 'static,
        S: Span + Send + Sync + 'static,
    {
        self.tracer_source = Some(Arc::new(move |name| {
            BoxedTracer::new(Box::new(provider.versioned_tracer(
                name,
                Some(crate::VERSION),
                None::<Cow<'static, str>>,
                None,
            )))
        }));
        self
    }

    /// Set the instrumentation scope name reported with spans.
    pub fn with_tracer_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.tracer_name = name.into();
        self
    }

    /// Override the global propagator used to inject trace context into
    /// request headers.
    pub fn with_propagator<P>(mut self, propagator: P) -> Self
    where
        P: TextMapPropagator + Send + Sync + 'static,
    {
        self.propagator = Some(Arc::new(propagator));
        self
    }

    /// Extra hints applied to span creation, in order.
    pub fn with_span_options(mut self, options: Vec<SpanStartOption>) -> Self {
        self.span_options = options;
        self
    }

    /// Skip tracing for requests matching `skipper`.
    pub fn with_skipper<F>(mut self, skipper: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.skipper = Arc::new(skipper);
        self
    }

    /// Replace the default method-based span name.
    pub fn with_span_name_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Request, bool) -> String + Send + Sync + 'static,
    {
        self.span_name_formatter = Arc::new(formatter);
        self
    }

    /// Suppress the `http.url` attribute (for URLs carrying sensitive data).
    pub fn with_hidden_url(mut self, hide: bool) -> Self {
        self.hide_url = hide;
        self
    }

    /// Finalize the config.
    pub fn build(self) -> TraceConfig {
        TraceConfig {
            tracer_source: self.tracer_source,
            tracer_name: self.tracer_name,
            propagator: self.propagator,
            span_options: self.span_options,
            skipper: self.skipper,
            span_name_formatter: self.span_name_formatter,
            hide_url: self.hide_url,
        }
    }
}
