pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};

pub use extractors::CurrentUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService, TokenSettings, TokenType};

/// Value of `token_type` in every token response.
pub const BEARER: &str = "bearer";

/// Represents the payload for a user login request.
///
/// No format rules apply: any username/password pair is checked against the
/// credential store, and every miss is an `InvalidCredentials`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Payload for `POST /renew`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RenewRequest {
    pub refresh_token: String,
}

/// Returned by a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

/// Returned by a successful renewal; only a fresh access token is minted.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
}
