//! Backend entry-point: loads settings, connects to MongoDB and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use effortee::inbound::http::health::HealthState;
use effortee::outbound::persistence::MongoStore;
use effortee::settings::{AppSettings, process_env};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| std::io::Error::other(err.to_string()))?
        .with_legacy_env(process_env)
        .map_err(std::io::Error::other)?;
    let api_token = settings.api_token().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let store = MongoStore::connect(&settings.connection())
        .await
        .map_err(std::io::Error::other)?;
    store.ping().await.map_err(std::io::Error::other)?;
    info!(database = settings.database(), "connected to MongoDB");

    let health_state = web::Data::new(HealthState::new().with_store(Arc::new(store.clone())));
    let config = ServerConfig::new(api_token, bind_addr).with_store(store);
    info!(addr = %config.bind_addr(), "starting HTTP server");

    let server = create_server(health_state, config)?;
    server.await
}
