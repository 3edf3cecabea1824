//! Domain-level error type.
//!
//! Errors are transport agnostic: each [`ErrorCode`] knows its stable wire
//! code and default message, while the HTTP adapter owns the status mapping.
//! Several codes intentionally share a wire code (for example cart and order
//! validation failures) because clients key on the pair of status and code.

use crate::domain::TraceId;

/// Failure categories surfaced by the marketplace core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Anything the caller cannot fix.
    Unexpected,
    /// A backing store could not be reached.
    ServiceUnavailable,
    /// A cart request carried a value outside its allowed range.
    InvalidCartField,
    /// A request body omitted a required field.
    MissingRequiredFields,
    /// An order request carried a malformed or out-of-range value.
    InvalidFieldFormat,
    /// No credentials were presented.
    Unauthenticated,
    /// The `Authorization` header is not a bearer credential.
    BadAuthorizationHeader,
    /// The bearer token failed verification.
    InvalidToken,
    /// A referenced catalog item does not exist.
    ItemNotFound,
    /// A line asks for more units than the item has in stock.
    NotEnoughStock,
    /// An order request listed no items.
    EmptyItemList,
    /// The referenced order does not exist.
    OrderNotFound,
    /// The order belongs to another user.
    NotYourOrder,
    /// The order already reached a terminal status.
    InvalidOrderStatus,
    /// Checkout was requested on an empty cart.
    EmptyCart,
}

impl ErrorCode {
    /// Stable code placed in the `error_code` field of responses.
    #[must_use]
    pub const fn wire_code(self) -> &'static str {
        match self {
            Self::Unexpected | Self::ServiceUnavailable => "ERR_000",
            Self::InvalidCartField | Self::MissingRequiredFields => "ERR_002",
            Self::InvalidFieldFormat => "ERR_003",
            Self::Unauthenticated => "ERR_005",
            Self::BadAuthorizationHeader => "ERR_006",
            Self::InvalidToken => "ERR_007",
            Self::ItemNotFound => "ERR_013",
            Self::NotEnoughStock => "ERR_017",
            Self::EmptyItemList => "ERR_018",
            Self::OrderNotFound => "ERR_019",
            Self::NotYourOrder => "ERR_020",
            Self::InvalidOrderStatus => "ERR_021",
            Self::EmptyCart => "ERR_024",
        }
    }

    /// Client-facing message used when no more specific text is supplied.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Unexpected => "Unexpected error occurred",
            Self::ServiceUnavailable => "SERVICE UNAVAILABLE",
            Self::MissingRequiredFields => "MISSING REQUIRED FIELDS",
            Self::InvalidCartField | Self::InvalidFieldFormat => "INVALID FIELD FORMAT",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::BadAuthorizationHeader => "BAD AUTHORIZATION HEADER",
            Self::InvalidToken => "INVALID TOKEN",
            Self::ItemNotFound => "ITEM NOT FOUND",
            Self::NotEnoughStock => "NOT ENOUGH STOCK",
            Self::EmptyItemList | Self::EmptyCart => "EMPTY ITEM LIST",
            Self::OrderNotFound => "ORDER NOT FOUND",
            Self::NotYourOrder => "NOT YOUR ORDER",
            Self::InvalidOrderStatus => "INVALID ORDER STATUS",
        }
    }

    /// Whether the message may contain internal detail that must not leak.
    #[must_use]
    pub const fn is_internal(self) -> bool {
        matches!(self, Self::Unexpected | Self::ServiceUnavailable)
    }
}

/// Domain error carrying a code, a message and the request trace id.
///
/// # Examples
/// ```
/// use marketplace::domain::{Error, ErrorCode};
///
/// let err = Error::not_enough_stock();
/// assert_eq!(err.code(), ErrorCode::NotEnoughStock);
/// assert_eq!(err.code().wire_code(), "ERR_017");
/// assert_eq!(err.message(), "NOT ENOUGH STOCK");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
}

impl Error {
    /// Build an error, capturing the trace id in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Build an error carrying the code's default message.
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Failure category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message text; internal codes may carry diagnostic detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Trace id captured when the error was built.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Override the captured trace id.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Unexpected failure; `message` is logged, never returned to clients.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unexpected, message)
    }

    /// Backing store unreachable; `message` is logged, never returned.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    #[must_use]
    pub fn invalid_cart_field() -> Self {
        Self::from_code(ErrorCode::InvalidCartField)
    }

    #[must_use]
    pub fn missing_required_fields() -> Self {
        Self::from_code(ErrorCode::MissingRequiredFields)
    }

    #[must_use]
    pub fn invalid_field_format() -> Self {
        Self::from_code(ErrorCode::InvalidFieldFormat)
    }

    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::from_code(ErrorCode::Unauthenticated)
    }

    #[must_use]
    pub fn bad_authorization_header() -> Self {
        Self::from_code(ErrorCode::BadAuthorizationHeader)
    }

    #[must_use]
    pub fn invalid_token() -> Self {
        Self::from_code(ErrorCode::InvalidToken)
    }

    #[must_use]
    pub fn item_not_found() -> Self {
        Self::from_code(ErrorCode::ItemNotFound)
    }

    #[must_use]
    pub fn not_enough_stock() -> Self {
        Self::from_code(ErrorCode::NotEnoughStock)
    }

    #[must_use]
    pub fn empty_item_list() -> Self {
        Self::from_code(ErrorCode::EmptyItemList)
    }

    #[must_use]
    pub fn order_not_found() -> Self {
        Self::from_code(ErrorCode::OrderNotFound)
    }

    #[must_use]
    pub fn not_your_order() -> Self {
        Self::from_code(ErrorCode::NotYourOrder)
    }

    #[must_use]
    pub fn invalid_order_status() -> Self {
        Self::from_code(ErrorCode::InvalidOrderStatus)
    }

    #[must_use]
    pub fn empty_cart() -> Self {
        Self::from_code(ErrorCode::EmptyCart)
    }
}
