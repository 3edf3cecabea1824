//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use marketplace::outbound::memory::CatalogSeed;
use marketplace::outbound::persistence::DbPool;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_secret: Zeroizing<Vec<u8>>,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) catalog_seed: Option<CatalogSeed>,
}

impl ServerConfig {
    /// Configuration backed by an empty in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_secret: Zeroizing<Vec<u8>>) -> Self {
        Self {
            bind_addr,
            token_secret,
            db_pool: None,
            catalog_seed: None,
        }
    }

    /// Back the ports with PostgreSQL instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Catalog loaded into the in-memory store. Ignored with a database.
    #[must_use]
    pub fn with_catalog_seed(mut self, seed: Option<CatalogSeed>) -> Self {
        self.catalog_seed = seed;
        self
    }
}
