//! Shared translation of pool and Diesel failures into port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{CartRepositoryError, CatalogLookupError, OrderRepositoryError};

use super::pool::PoolError;

/// Port error enums exposing `Connection` and `Query` variants.
pub(crate) trait StoreFailure: Sized {
    fn connection(message: String) -> Self;
    fn query(message: String) -> Self;
}

macro_rules! store_failure {
    ($($error:ty),* $(,)?) => {
        $(
            impl StoreFailure for $error {
                fn connection(message: String) -> Self {
                    <$error>::connection(message)
                }

                fn query(message: String) -> Self {
                    <$error>::query(message)
                }
            }
        )*
    };
}

store_failure!(CatalogLookupError, CartRepositoryError, OrderRepositoryError);

/// A pool that cannot hand out a connection is a connection failure.
pub(crate) fn pool_failure<E: StoreFailure>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection(message)
}

/// Map a Diesel error, keeping driver detail in debug logs only.
pub(crate) fn diesel_failure<E: StoreFailure>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => E::query("record not found".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection("database connection closed".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            E::query("row violates a check constraint".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            E::query("transaction could not be serialised".to_owned())
        }
        _ => E::query("database error".to_owned()),
    }
}
