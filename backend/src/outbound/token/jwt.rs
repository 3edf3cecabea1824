//! HS256 JSON Web Tokens carrying the user id in `sub`.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::domain::ports::{AccessTokenError, AccessTokenVerifier};

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id.
    pub sub: String,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Signing failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to sign access token: {message}")]
pub struct TokenIssueError {
    message: String,
}

/// Issues and verifies HS256 access tokens with a shared secret.
pub struct JwtAccessTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAccessTokens {
    /// Build from the raw shared secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a token for `user_id` valid for `ttl`.
    ///
    /// # Errors
    /// [`TokenIssueError`] when encoding fails.
    pub fn issue(&self, user_id: &UserId, ttl: Duration) -> Result<String, TokenIssueError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|err| {
            TokenIssueError {
                message: err.to_string(),
            }
        })
    }
}

impl AccessTokenVerifier for JwtAccessTokens {
    fn verify(&self, token: &str) -> Result<UserId, AccessTokenError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => AccessTokenError::expired(),
                _ => AccessTokenError::invalid(err.to_string()),
            },
        )?;
        UserId::new(&data.claims.sub).map_err(|err| AccessTokenError::invalid(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn tokens() -> JwtAccessTokens {
        JwtAccessTokens::new(b"test-secret-for-marketplace")
    }

    #[rstest]
    fn issued_tokens_verify_to_their_subject(tokens: JwtAccessTokens) {
        let user_id = UserId::random();
        let token = tokens.issue(&user_id, Duration::minutes(5)).expect("token");

        assert_eq!(tokens.verify(&token), Ok(user_id));
    }

    #[rstest]
    fn expired_tokens_are_reported_as_expired(tokens: JwtAccessTokens) {
        let token = tokens
            .issue(&UserId::random(), Duration::minutes(-5))
            .expect("token");

        assert_eq!(tokens.verify(&token), Err(AccessTokenError::expired()));
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_invalid(tokens: JwtAccessTokens) {
        let other = JwtAccessTokens::new(b"some-other-secret");
        let token = other
            .issue(&UserId::random(), Duration::minutes(5))
            .expect("token");

        assert!(matches!(
            tokens.verify(&token),
            Err(AccessTokenError::Invalid { .. })
        ));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("a.b.c")]
    fn garbage_is_invalid(tokens: JwtAccessTokens, #[case] token: &str) {
        assert!(matches!(
            tokens.verify(token),
            Err(AccessTokenError::Invalid { .. })
        ));
    }

    #[rstest]
    fn non_uuid_subjects_are_invalid(tokens: JwtAccessTokens) {
        let claims = AccessClaims {
            sub: "admin".to_owned(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret-for-marketplace"),
        )
        .expect("token");

        assert!(matches!(
            tokens.verify(&token),
            Err(AccessTokenError::Invalid { .. })
        ));
    }
}
