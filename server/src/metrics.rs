//! Prometheus metrics & middleware helper.

use actix_web::{get, web, HttpResponse, Responder};
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Global Prometheus handle for the HTTP middleware (request counts/latency).
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics") // exposed URL
        .build()
        .expect("metrics builder")
});

/// Registry for relay-specific series, served at `/relay-metrics`.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    registry
        .register(Box::new(SUBMISSIONS.clone()))
        .expect("register relay_submissions_total");
    registry
});

/// Relay outcomes by `success` or the failing step.
pub static SUBMISSIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("relay_submissions_total", "Relay attempts by outcome"),
        &["outcome"],
    )
    .expect("relay_submissions_total opts")
});

pub fn record_submission(outcome: &str) {
    // Touch the registry so the counter is registered before first scrape.
    Lazy::force(&REGISTRY);
    SUBMISSIONS.with_label_values(&[outcome]).inc();
}

#[get("/relay-metrics")]
async fn relay_metrics() -> impl Responder {
    let mut buf = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&REGISTRY.gather(), &mut buf) {
        log::warn!("metrics encode failed: {e}");
        return HttpResponse::InternalServerError().finish();
    }
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buf)
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(relay_metrics);
}
