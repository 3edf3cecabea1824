//! Strongly typed identifiers for marketplace entities.
//!
//! Every identifier wraps a UUID. Keeping them as distinct types stops an
//! item id from being passed where an order id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raised when identifier text is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID")]
pub struct InvalidIdentifier {
    kind: &'static str,
}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its textual UUID form.
            ///
            /// # Errors
            /// Returns [`InvalidIdentifier`] when `value` is not a UUID.
            pub fn new(value: impl AsRef<str>) -> Result<Self, InvalidIdentifier> {
                Uuid::parse_str(value.as_ref())
                    .map(Self)
                    .map_err(|_| InvalidIdentifier { kind: $kind })
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = InvalidIdentifier;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_identifier!(
    /// Account identifier issued by the identity service.
    UserId,
    "user id"
);
uuid_identifier!(
    /// Catalog item identifier.
    ItemId,
    "item id"
);
uuid_identifier!(
    /// Store identifier.
    StoreId,
    "store id"
);
uuid_identifier!(
    /// Order identifier, assigned by the core when an order is placed.
    OrderId,
    "order id"
);
