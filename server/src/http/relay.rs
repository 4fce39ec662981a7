//! POST /relay: sign and submit an `emitBurn` call for the caller.

use actix_web::{post, web, HttpResponse};
use serde::Serialize;

use crate::{
    chain::{BurnRequest, Relayer},
    metrics,
};

/// JSON response for every relay outcome.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub success: bool,
    /// Always present; empty on failure.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn submitted(tx_hash: String) -> Self {
        Self {
            success: true,
            message: "Transaction submitted successfully".into(),
            tx_hash: Some(tx_hash),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: String::new(),
            tx_hash: None,
            error: Some(error.into()),
        }
    }
}

#[post("/relay")]
async fn relay(relayer: web::Data<Relayer>, req: web::Json<BurnRequest>) -> HttpResponse {
    let req = req.into_inner();
    if !req.is_complete() {
        return HttpResponse::BadRequest().json(RelayResponse::failure(
            "ephemeralPublicKey and burnAddress are required",
        ));
    }

    log::info!(
        "relay request received - PublicKey: {}, BurnAddress: {}",
        req.ephemeral_public_key,
        req.burn_address
    );

    match relayer.emit_burn(&req).await {
        Ok(hash) => {
            metrics::record_submission("success");
            HttpResponse::Ok().json(RelayResponse::submitted(hash))
        }
        Err(e) => {
            metrics::record_submission(e.kind());
            tracing::error!(kind = e.kind(), "relay failed: {e}");
            HttpResponse::InternalServerError().json(RelayResponse::failure(format!(
                "Failed to relay transaction: {e}"
            )))
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(relay);
}
