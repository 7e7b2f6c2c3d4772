//! Span lifecycle hooks
//!
//! [`trace_client`] wires three callbacks into a [`HookClient`]: one that
//! starts a span and injects trace context before the request is sent, and
//! two finalizers of which exactly one runs per traced request: the
//! after-response hook on success, the error hook on transport failure.
//!
//! The span travels between the callbacks inside the request's extensions
//! slot, wrapped in [`ActiveSpan`]. There is no side table keyed by request
//! identity; the request value itself is the only channel. If neither
//! finalizer runs (a panic unwinding past the client, for instance), the span
//! is never ended and leaks. That is a documented limitation, not something
//! this module papers over.
//!
//! None of the hooks can fail: a tracing problem must never break the
//! underlying HTTP call.

use std::sync::Arc;

use opentelemetry::global::BoxedTracer;
use opentelemetry::trace::{Span, SpanBuilder, Status, TraceContextExt, Tracer};
use opentelemetry::Context;
use tracing::{debug, trace};

use crate::attributes::{request_attributes, response_attributes, start_attributes};
use crate::client::{
    AfterResponseHook, BeforeRequestHook, ErrorHook, HookClient, Request, Response, TransportError,
};
use crate::config::{SpanStartOption, TraceConfig};
use crate::propagation::inject_context;

/// Correlation value stored in the request extensions between the
/// before-request hook and whichever finalizing hook runs.
///
/// Wrapping the context in a private type keeps the finalizers from ever
/// picking up a caller-seeded context: a skipped request leaves no
/// `ActiveSpan` behind, so its finalizer recovers an empty context whose span
/// handle is inert.
#[derive(Debug, Clone)]
pub struct ActiveSpan(Context);

impl ActiveSpan {
    /// The span-bearing context, usable by downstream transport code to
    /// parent its own spans.
    pub fn context(&self) -> &Context {
        &self.0
    }
}

/// The span-bearing context carried by `extensions`, or an empty context when
/// the before-request hook skipped (or never ran). An empty context yields a
/// no-op span handle, so callers can annotate and end it unconditionally.
pub fn active_context(extensions: &http::Extensions) -> Context {
    extensions
        .get::<ActiveSpan>()
        .map(|active| active.0.clone())
        .unwrap_or_else(Context::new)
}

/// Instrument `client` by appending before-request, after-response, and error
/// hooks, in that order.
///
/// Hooks already registered on the client are left in place. The tracer is
/// resolved here, not at config-build time, so a globally registered provider
/// installed in between is honored.
pub fn trace_client<C>(client: &mut C, config: TraceConfig)
where
    C: HookClient + ?Sized,
{
    let tracer = Arc::new(config.tracer());
    let config = Arc::new(config);
    debug!(tracer_name = config.tracer_name(), "installing tracing hooks");

    client.on_before_request(on_before_request(tracer, Arc::clone(&config)));
    client.on_after_response(on_after_response(Arc::clone(&config)));
    client.on_error(on_error(config));
}

fn on_before_request(tracer: Arc<BoxedTracer>, config: Arc<TraceConfig>) -> BeforeRequestHook {
    Box::new(move |req: &mut Request| {
        if config.skip(req) {
            trace!(url = %req.url(), "request skipped by tracing skipper");
            return;
        }

        // The request is not fully resolved yet, so the method serves as a
        // provisional name; the finalizing hook re-derives the real one.
        let parent_cx = req
            .extensions()
            .get::<Context>()
            .cloned()
            .unwrap_or_else(Context::current);

        let mut builder = SpanBuilder::from_name(req.method().to_string());
        for option in config.span_options() {
            builder = match option {
                SpanStartOption::Kind(kind) => builder.with_kind(kind.clone()),
                SpanStartOption::Attribute(attribute) => {
                    let mut attributes = builder.attributes.take().unwrap_or_default();
                    attributes.push(attribute.clone());
                    builder.with_attributes(attributes)
                }
            };
        }

        let mut span = tracer.build_with_context(builder, &parent_cx);
        for attribute in start_attributes(req, config.hide_url()) {
            span.set_attribute(attribute);
        }

        let cx = parent_cx.with_span(span);
        inject_context(config.propagator(), &cx, req.headers_mut());
        req.extensions_mut().insert(ActiveSpan(cx));
    })
}

fn on_after_response(config: Arc<TraceConfig>) -> AfterResponseHook {
    Box::new(move |res: &Response| {
        let cx = active_context(res.request().extensions());
        let span = cx.span();
        for attribute in response_attributes(res) {
            span.set_attribute(attribute);
        }

        // Request attributes are set here rather than in the before hook:
        // only now is the request in its final, fully-resolved form.
        span.update_name(config.span_name(res.request(), false));
        for attribute in request_attributes(res.request(), config.hide_url()) {
            span.set_attribute(attribute);
        }

        span.end();
    })
}

fn on_error(config: Arc<TraceConfig>) -> ErrorHook {
    Box::new(move |req: &Request, err: &TransportError| {
        let cx = active_context(req.extensions());
        let span = cx.span();
        span.set_status(Status::error(err.to_string()));
        span.update_name(config.span_name(req, true));
        for attribute in request_attributes(req, config.hide_url()) {
            span.set_attribute(attribute);
        }
        span.end();
    })
}
