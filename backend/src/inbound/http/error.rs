//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while letting Actix
//! handlers turn domain failures into `{error_code, error_msg}` bodies with
//! consistent status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};
use crate::inbound::http::schemas::ErrorBody;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidCartField
        | ErrorCode::MissingRequiredFields
        | ErrorCode::InvalidFieldFormat
        | ErrorCode::BadAuthorizationHeader => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthenticated | ErrorCode::InvalidToken => StatusCode::UNAUTHORIZED,
        ErrorCode::NotYourOrder => StatusCode::FORBIDDEN,
        ErrorCode::ItemNotFound | ErrorCode::OrderNotFound => StatusCode::NOT_FOUND,
        ErrorCode::NotEnoughStock | ErrorCode::InvalidOrderStatus => StatusCode::CONFLICT,
        ErrorCode::EmptyItemList | ErrorCode::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wire body for `error`. Internal codes lose their diagnostic message.
pub(crate) fn error_body(error: &Error) -> ErrorBody {
    let code = error.code();
    let error_msg = if code.is_internal() {
        code.default_message().to_owned()
    } else {
        error.message().to_owned()
    };
    ErrorBody {
        error_code: code.wire_code().to_owned(),
        error_msg,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = self.code().wire_code(),
                message = self.message(),
                "request failed"
            );
        } else {
            warn!(code = self.code().wire_code(), status = status.as_u16(), "request rejected");
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(error_body(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("actix error")
    }
}
