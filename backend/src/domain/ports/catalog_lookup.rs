//! Driven port resolving item ids to catalog snapshots.

use async_trait::async_trait;

use crate::domain::{CatalogItem, ItemId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalog lookup adapters.
    pub enum CatalogLookupError {
        /// The catalog store could not be reached.
        Connection { message: String } =>
            "catalog lookup connection failed: {message}",
        /// The lookup query failed.
        Query { message: String } =>
            "catalog lookup query failed: {message}",
    }
}

/// Batch lookup of current item data joined with the owning store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Resolve the given ids.
    ///
    /// Unknown ids are silently skipped and duplicates resolve once, so the
    /// caller compares the result with the distinct ids it asked for.
    async fn find_items(&self, item_ids: &[ItemId]) -> Result<Vec<CatalogItem>, CatalogLookupError>;
}
