//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost; added in `main`)
//! 2. `TraceLayer` (request span with method, path and request ID)
//! 3. Request ID (add unique ID to each request)

pub mod request_id;

use axum::extract::Request;
use tracing::Span;

pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};

/// Build the span `TraceLayer` opens for each request.
///
/// `request_id` starts empty and is filled in by [`request_id_middleware`].
pub fn make_request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = tracing::field::Empty,
    )
}
