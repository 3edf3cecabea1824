//! JSON catalog seed for the in-memory adapter.
//!
//! ```json
//! {
//!   "stores": [
//!     {
//!       "id": "6a1f0d0e-7d0b-4c52-8a7e-2d7f3c1f9b10",
//!       "name": "Bakery",
//!       "delivery_fee": 3000,
//!       "items": [
//!         { "id": "…", "name": "Bread", "price": 5000, "stock": 10 }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{CatalogItem, ItemId, StoreId, StoreSnapshot};

/// Failure to read or parse a seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read catalog seed {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog seed {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Item entry of a seeded store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemSeed {
    pub id: ItemId,
    pub name: String,
    pub price: u64,
    pub stock: u32,
}

/// Store entry with the items it sells.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreSeed {
    pub id: StoreId,
    pub name: String,
    #[serde(default)]
    pub delivery_fee: u64,
    #[serde(default)]
    pub items: Vec<ItemSeed>,
}

/// Whole seed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub stores: Vec<StoreSeed>,
}

impl CatalogSeed {
    /// Read and parse a seed file.
    ///
    /// # Errors
    /// Returns [`SeedError::Read`] when the file cannot be read and
    /// [`SeedError::Parse`] when it is not a valid seed document.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Flatten the seed into catalog items.
    pub fn catalog_items(&self) -> impl Iterator<Item = CatalogItem> + '_ {
        self.stores.iter().flat_map(|store| {
            let snapshot = StoreSnapshot {
                id: store.id,
                name: store.name.clone(),
                delivery_fee: store.delivery_fee,
            };
            store.items.iter().map(move |item| CatalogItem {
                id: item.id,
                name: item.name.clone(),
                price: item.price,
                stock: item.stock,
                store: snapshot.clone(),
            })
        })
    }
}
