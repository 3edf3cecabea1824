//! Driven port verifying bearer access tokens.

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Reasons a token is refused.
    pub enum AccessTokenError {
        /// Signature, structure or claims are invalid.
        Invalid { message: String } => "access token rejected: {message}",
        /// The token is past its expiry.
        Expired => "access token expired",
    }
}

/// Resolve a bearer token to the user it was issued for.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenVerifier: Send + Sync {
    /// Verify `token` and return its subject.
    fn verify(&self, token: &str) -> Result<UserId, AccessTokenError>;
}
