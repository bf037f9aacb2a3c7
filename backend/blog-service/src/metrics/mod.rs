//! Prometheus metrics for blog-service.
//!
//! Exposes feed counters and an HTTP handler for the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Total feed requests processed, segmented by scope (all, group,
    /// author, followed).
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Total feed requests segmented by scope",
        &["scope"]
    )
    .expect("failed to register feed_request_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
