//! Driven port for cart line persistence.

use async_trait::async_trait;

use crate::domain::{CartEntry, CartLine, ItemId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by cart repository adapters.
    pub enum CartRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "cart repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "cart repository query failed: {message}",
    }
}

/// Storage for cart lines keyed by `(user, item)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Insert the line or overwrite the quantity of the existing one.
    async fn upsert_line(&self, line: &CartLine) -> Result<(), CartRepositoryError>;

    /// Delete the line if present. Absent lines are not an error.
    async fn remove_line(&self, user_id: &UserId, item_id: &ItemId)
    -> Result<(), CartRepositoryError>;

    /// All of the user's lines joined with current item and store data,
    /// oldest line first.
    async fn entries_for(&self, user_id: &UserId) -> Result<Vec<CartEntry>, CartRepositoryError>;

    /// Delete every line of the user.
    async fn clear(&self, user_id: &UserId) -> Result<(), CartRepositoryError>;
}
