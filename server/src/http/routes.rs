use actix_web::{
    error::InternalError,
    guard,
    http::header,
    middleware::DefaultHeaders,
    web, HttpResponse,
};

use crate::{http, http::relay::RelayResponse, metrics};

/// Mount every HTTP sub-module at the root.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .configure(http::health::init_routes)
        .configure(http::relay::init_routes)
        .configure(metrics::init_routes)
        // Preflight for any path; registered last so real routes win.
        .route(
            "/{tail:.*}",
            web::route().guard(guard::Options()).to(preflight),
        );
}

/// Permissive CORS headers added to every response.
pub fn cors() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((
            header::ACCESS_CONTROL_ALLOW_METHODS,
            "GET, POST, PUT, DELETE, OPTIONS",
        ))
        .add((
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            "Content-Type, Authorization",
        ))
        .add((header::ACCESS_CONTROL_MAX_AGE, "3600"))
}

async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Malformed bodies get the same JSON shape as every other relay response.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = RelayResponse::failure(format!("Invalid request body: {err}"));
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}
