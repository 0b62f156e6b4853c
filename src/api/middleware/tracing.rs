//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::http::{Request, header};
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

type MakeSpanFn = fn(&Request<Body>) -> Span;

/// Creates a tracing middleware for HTTP requests.
///
/// Each request gets an `INFO` span carrying method, host and path, so the
/// resolution logs emitted by the handlers are attributable to a site. The
/// response is logged at `DEBUG` with its latency in microseconds.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=GET host=ua.example.com path=/foo}: Redirect resolved tier=static ...
/// ```
pub fn layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    MakeSpanFn,
    DefaultOnRequest,
    DefaultOnResponse,
> {
    TraceLayer::new_for_http()
        .make_span_with(make_span as MakeSpanFn)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::DEBUG)
                .latency_unit(LatencyUnit::Micros),
        )
}

fn make_span(request: &Request<Body>) -> Span {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        host,
        path = request.uri().path(),
    )
}
