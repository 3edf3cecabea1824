//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs keep every field optional so an absent field surfaces as the
//! operation's missing-field code instead of a generic deserialisation
//! failure. Each helper takes the error constructor for its operation family
//! because cart and order endpoints report the same fault with different
//! codes.

use std::str::FromStr;

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use tracing::debug;

use crate::domain::Error;

/// Newtype wrapper for HTTP field names used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Unwrap a required field or report it missing.
pub(crate) fn require<T>(
    value: Option<T>,
    field: FieldName,
    missing: fn() -> Error,
) -> Result<T, Error> {
    value.ok_or_else(|| {
        debug!(field = field.as_str(), "required field missing");
        missing()
    })
}

/// Parse an identifier field or report it malformed.
pub(crate) fn parse_field<T: FromStr>(
    value: &str,
    field: FieldName,
    invalid: fn() -> Error,
) -> Result<T, Error> {
    value.parse().map_err(|_| {
        debug!(field = field.as_str(), value, "field failed to parse");
        invalid()
    })
}

/// Operation family a request body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Cart,
    Order,
}

impl BodyKind {
    fn of(req: &HttpRequest) -> Self {
        if req.path().trim_end_matches('/').starts_with("/api/carts") {
            Self::Cart
        } else {
            Self::Order
        }
    }

    fn invalid(self) -> Error {
        match self {
            Self::Cart => Error::invalid_cart_field(),
            Self::Order => Error::invalid_field_format(),
        }
    }
}

/// Map body deserialisation failures (wrong JSON types, bad syntax, wrong
/// content type) to the invalid-format code of the route's family.
pub(crate) fn json_body_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "request body rejected");
    BodyKind::of(req).invalid().into()
}

/// JSON extractor configuration installed on the API scope.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_body_error)
}
