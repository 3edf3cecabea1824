//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MARKETPLACE_*` environment variables and
//! configuration files, in that order of precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

const DEFAULT_BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_BIND_PORT: u16 = 8080;

/// Settings controlling the HTTP listener, storage and token verification.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct MarketplaceSettings {
    /// Address to bind the HTTP listener to.
    #[ortho_config(default = DEFAULT_BIND_HOST)]
    pub bind_host: IpAddr,
    /// Port to bind the HTTP listener to.
    #[ortho_config(default = DEFAULT_BIND_PORT)]
    pub bind_port: u16,
    /// PostgreSQL connection string. Without it the in-memory store is used.
    pub database_url: Option<String>,
    /// Shared HS256 secret for access tokens.
    pub token_secret: Option<String>,
    /// JSON catalog loaded into the in-memory store.
    pub catalog_seed: Option<PathBuf>,
    /// Upper bound on pooled database connections.
    pub db_pool_max_size: Option<u32>,
}

impl MarketplaceSettings {
    /// Socket address for the listener.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.bind_port)
    }

    /// Token secret moved into memory that is wiped on drop.
    #[must_use]
    pub fn token_secret(&self) -> Option<Zeroizing<Vec<u8>>> {
        self.token_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| Zeroizing::new(secret.as_bytes().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 6] = [
        "MARKETPLACE_BIND_HOST",
        "MARKETPLACE_BIND_PORT",
        "MARKETPLACE_DATABASE_URL",
        "MARKETPLACE_TOKEN_SECRET",
        "MARKETPLACE_CATALOG_SEED",
        "MARKETPLACE_DB_POOL_MAX_SIZE",
    ];

    fn load_from_empty_args() -> MarketplaceSettings {
        MarketplaceSettings::load_from_iter([OsString::from("marketplace")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert!(settings.database_url.is_none());
        assert!(settings.token_secret().is_none());
        assert!(settings.catalog_seed.is_none());
        assert!(settings.db_pool_max_size.is_none());
    }

    #[rstest]
    fn port_override_keeps_the_default_host() {
        let _guard = lock_env(VARS.map(|name| {
            (name, (name == "MARKETPLACE_BIND_PORT").then(|| "9191".to_owned()))
        }));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_host, DEFAULT_BIND_HOST);
        assert_eq!(settings.bind_port, 9191);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("MARKETPLACE_BIND_HOST", Some("127.0.0.1".to_owned())),
            ("MARKETPLACE_BIND_PORT", Some("9090".to_owned())),
            (
                "MARKETPLACE_DATABASE_URL",
                Some("postgres://localhost/marketplace".to_owned()),
            ),
            ("MARKETPLACE_TOKEN_SECRET", Some("s3cret".to_owned())),
            (
                "MARKETPLACE_CATALOG_SEED",
                Some("/tmp/catalog.json".to_owned()),
            ),
            ("MARKETPLACE_DB_POOL_MAX_SIZE", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090".parse().expect("addr"));
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/marketplace")
        );
        assert_eq!(
            settings.token_secret().as_deref().map(Vec::as_slice),
            Some(b"s3cret".as_slice())
        );
        assert_eq!(settings.catalog_seed, Some(PathBuf::from("/tmp/catalog.json")));
        assert_eq!(settings.db_pool_max_size, Some(4));
    }

    #[rstest]
    fn empty_secrets_are_ignored() {
        let _guard = lock_env(
            VARS.map(|name| (name, (name == "MARKETPLACE_TOKEN_SECRET").then(String::new))),
        );

        assert!(load_from_empty_args().token_secret().is_none());
    }
}
