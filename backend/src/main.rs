//! Marketplace entry-point: loads settings, prepares storage and serves the
//! REST API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use marketplace::inbound::http::health::HealthState;
use marketplace::outbound::memory::CatalogSeed;
use marketplace::outbound::persistence::{DbPool, PoolConfig, apply_migrations};
use marketplace::settings::MarketplaceSettings;
use server::{ServerConfig, create_server};

const DEV_TOKEN_SECRET: &[u8] = b"marketplace-dev-secret";

fn token_secret(settings: &MarketplaceSettings) -> io::Result<Zeroizing<Vec<u8>>> {
    if let Some(secret) = settings.token_secret() {
        return Ok(secret);
    }
    if cfg!(debug_assertions) {
        warn!("MARKETPLACE_TOKEN_SECRET unset; using the development secret");
        return Ok(Zeroizing::new(DEV_TOKEN_SECRET.to_vec()));
    }
    Err(io::Error::other("MARKETPLACE_TOKEN_SECRET must be set"))
}

async fn connect_database(settings: &MarketplaceSettings, url: String) -> io::Result<DbPool> {
    let migration_url = url.clone();
    let applied = tokio::task::spawn_blocking(move || apply_migrations(&migration_url))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    info!(applied, "database schema is current");

    let mut pool_config = PoolConfig::new(url);
    if let Some(max_size) = settings.db_pool_max_size {
        pool_config = pool_config.with_max_size(max_size);
    }
    DbPool::new(pool_config).await.map_err(io::Error::other)
}

fn load_seed(settings: &MarketplaceSettings) -> io::Result<Option<CatalogSeed>> {
    let Some(path) = settings.catalog_seed.as_ref() else {
        return Ok(None);
    };
    let seed = CatalogSeed::from_path(path).map_err(io::Error::other)?;
    info!(path = %path.display(), stores = seed.stores.len(), "catalog seed loaded");
    Ok(Some(seed))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = MarketplaceSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(err.to_string()))?;

    let mut config = ServerConfig::new(settings.bind_addr(), token_secret(&settings)?);
    match settings.database_url.clone() {
        Some(url) => {
            config = config.with_db_pool(connect_database(&settings, url).await?);
        }
        None => {
            warn!("no database configured; state lives in process memory");
            config = config.with_catalog_seed(load_seed(&settings)?);
        }
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %settings.bind_addr(), "starting HTTP server");
    let server = create_server(health_state.clone(), config)?;
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}
