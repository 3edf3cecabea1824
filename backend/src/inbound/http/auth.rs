//! Bearer token authentication for API routes.
//!
//! ```text
//! Authorization: Bearer <jwt>
//! ```
//!
//! A missing header is `Unauthenticated`; a header that is not a bearer
//! credential is `BadAuthorizationHeader`; a token the verifier refuses is
//! `InvalidToken`.

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::ports::AccessTokenError;
use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Caller identity resolved from the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.0
    }

    #[must_use]
    pub const fn into_inner(self) -> UserId {
        self.0
    }
}

/// Extract the token from a `Bearer <token>` header value.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(Error::unauthenticated)?;
    let raw = value
        .to_str()
        .map_err(|_| Error::bad_authorization_header())?;
    let (scheme, token) = raw
        .trim()
        .split_once(' ')
        .ok_or_else(Error::bad_authorization_header)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() || token.contains(' ') {
        return Err(Error::bad_authorization_header());
    }
    Ok(token)
}

fn map_token_error(error: AccessTokenError) -> Error {
    debug!(%error, "bearer token refused");
    Error::invalid_token()
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let token = bearer_token(req.headers())?;
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HttpState is not registered"))?;
    state
        .tokens
        .verify(token)
        .map(AuthenticatedUser)
        .map_err(map_token_error)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
