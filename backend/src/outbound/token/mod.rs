//! Bearer access token adapters.

mod jwt;

pub use jwt::{AccessClaims, JwtAccessTokens, TokenIssueError};
