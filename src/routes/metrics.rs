use axum::response::{IntoResponse, Response};
use hyper::StatusCode;
use prometheus::Encoder;

use crate::metrics::REGISTRY;

pub async fn metrics_handler() -> Response {
    let encoder = prometheus::TextEncoder::new();

    let mut res = encode(&encoder, &REGISTRY.gather(), "custom");
    res.push_str(&encode(&encoder, &prometheus::gather(), "prometheus"));

    (StatusCode::OK, res).into_response()
}

fn encode(
    encoder: &prometheus::TextEncoder,
    metric_families: &[prometheus::proto::MetricFamily],
    name: &str,
) -> String {
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(metric_families, &mut buffer) {
        log::error!("Could not encode {name} metrics: {e}");
    };
    String::from_utf8(buffer).unwrap_or_else(|e| {
        log::error!("The {name} metrics could not be from_utf8'd: {e}");
        String::default()
    })
}
