use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use burn_relay::{
    chain::{Relayer, RpcNode},
    config::Settings,
    http, metrics,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration problems are the only process-fatal errors.
    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            log::error!("failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let node = Arc::new(RpcNode::new(settings.ethereum_rpc.clone()));
    let relayer = web::Data::new(Relayer::new(
        node,
        settings.identity,
        settings.contract,
        settings.tx_params,
        settings.input_policy,
    ));

    log::info!(
        "relaying from {:?} to {:?} (chain {}, gas limit {}, policy {:?})",
        relayer.sender(),
        relayer.target().address,
        relayer.params().chain_id,
        relayer.params().gas_limit,
        settings.input_policy,
    );
    log::info!("server starting on {}", settings.server_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(http::routes::cors())
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(relayer.clone())
            .configure(http::routes::init_routes)
    })
    .bind(&settings.server_addr)?
    .run()
    .await
}
