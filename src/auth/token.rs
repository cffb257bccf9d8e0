//! Access/refresh token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying `sub`, `exp` and a `type` claim. Access and
//! refresh tokens are signed with different secrets, and verification checks the
//! `type` claim independently of which key decoded the token.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::User;
use crate::store::CredentialStore;

/// Discriminates the two kinds of token the service hands out.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Represents the claims encoded within a token.
///
/// `sub` and `type` are optional on the way in so that a token missing either
/// one is rejected by the verifier rather than by the JSON decoder.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Username of the token holder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
}

/// Secrets and lifetimes for both token kinds.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and verifies access/refresh token pairs.
///
/// Verification resolves the token subject through the injected
/// `CredentialStore`, so a token for a user who no longer exists is rejected.
pub struct TokenService {
    access: SigningKeys,
    refresh: SigningKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
    users: Arc<dyn CredentialStore>,
}

impl TokenService {
    pub fn new(settings: TokenSettings, users: Arc<dyn CredentialStore>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            access: SigningKeys::from_secret(&settings.access_secret),
            refresh: SigningKeys::from_secret(&settings.refresh_secret),
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
            validation,
            users,
        }
    }

    pub fn issue_access(&self, subject: &str) -> Result<String, AppError> {
        self.issue_access_at(subject, Utc::now())
    }

    pub fn issue_refresh(&self, subject: &str) -> Result<String, AppError> {
        self.issue_refresh_at(subject, Utc::now())
    }

    /// Issues an access token as if the current time were `now`.
    pub fn issue_access_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        self.issue(subject, TokenType::Access, now)
    }

    /// Issues a refresh token as if the current time were `now`.
    pub fn issue_refresh_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        self.issue(subject, TokenType::Refresh, now)
    }

    pub fn verify_access(&self, token: &str) -> Result<User, AppError> {
        self.verify(token, TokenType::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<User, AppError> {
        self.verify(token, TokenType::Refresh)
    }

    fn keys(&self, token_type: TokenType) -> &SigningKeys {
        match token_type {
            TokenType::Access => &self.access,
            TokenType::Refresh => &self.refresh,
        }
    }

    fn ttl(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        }
    }

    fn issue(
        &self,
        subject: &str,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let expiration = now.checked_add_signed(self.ttl(token_type)).ok_or_else(|| {
            AppError::InternalServerError(format!("{} token expiry overflows", token_type))
        })?;
        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: expiration.timestamp(),
            token_type: Some(token_type),
        };
        self.sign(&claims, token_type)
    }

    fn sign(&self, claims: &Claims, key: TokenType) -> Result<String, AppError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.keys(key).encoding,
        )
        .map_err(|e| AppError::InternalServerError(format!("Failed to sign token: {}", e)))
    }

    /// Every failure below is reported as `InvalidToken`; the reason is only logged.
    fn verify(&self, token: &str, expected: TokenType) -> Result<User, AppError> {
        // Signature, structure and expiry.
        let claims = decode::<Claims>(token, &self.keys(expected).decoding, &self.validation)?.claims;

        if claims.token_type != Some(expected) {
            log::debug!(
                "token rejected: expected {} token, got {:?}",
                expected,
                claims.token_type
            );
            return Err(AppError::InvalidToken);
        }

        let subject = match claims.sub {
            Some(subject) => subject,
            None => {
                log::debug!("token rejected: missing subject");
                return Err(AppError::InvalidToken);
            }
        };

        self.users.find(&subject).ok_or_else(|| {
            log::debug!("token rejected: unknown subject {:?}", subject);
            AppError::InvalidToken
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::store::InMemoryCredentialStore;

    fn settings() -> TokenSettings {
        TokenSettings {
            access_secret: "test-access-secret".into(),
            refresh_secret: "test-refresh-secret".into(),
            access_ttl: Duration::minutes(30),
            refresh_ttl: Duration::days(7),
        }
    }

    fn service_with(users: Vec<User>) -> TokenService {
        TokenService::new(settings(), Arc::new(InMemoryCredentialStore::from_users(users)))
    }

    fn service() -> TokenService {
        service_with(vec![
            User::new("admin", "unused", Role::Admin),
            User::new("user", "unused", Role::User),
        ])
    }

    fn assert_invalid(result: Result<User, AppError>) {
        match result {
            Err(AppError::InvalidToken) => {}
            other => panic!("expected InvalidToken, got {:?}", other),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = service();
        let token = service.issue_access("admin").unwrap();

        let user = service.verify_access(&token).unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let service = service();
        let token = service.issue_refresh("user").unwrap();

        assert_eq!(service.verify_refresh(&token).unwrap().username, "user");
    }

    #[test]
    fn test_claims_carry_type_and_expiry() {
        let service = service();
        let now = Utc::now();
        let token = service.issue_refresh_at("admin", now).unwrap();

        let claims = decode::<Claims>(&token, &service.refresh.decoding, &service.validation)
            .unwrap()
            .claims;
        assert_eq!(claims.sub.as_deref(), Some("admin"));
        assert_eq!(claims.token_type, Some(TokenType::Refresh));
        assert_eq!(claims.exp, (now + Duration::days(7)).timestamp());
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let service = service();

        assert_invalid(service.verify_access(&service.issue_refresh("admin").unwrap()));
        assert_invalid(service.verify_refresh(&service.issue_access("admin").unwrap()));
    }

    #[test]
    fn test_type_claim_checked_even_when_key_matches() {
        let service = service();
        let mislabeled = Claims {
            sub: Some("admin".into()),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
            token_type: Some(TokenType::Access),
        };
        // Signed with the refresh key but labelled as an access token.
        let token = service.sign(&mislabeled, TokenType::Refresh).unwrap();

        assert_invalid(service.verify_refresh(&token));
    }

    #[test]
    fn test_missing_type_claim() {
        let service = service();
        let untyped = Claims {
            sub: Some("admin".into()),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
            token_type: None,
        };
        let token = service.sign(&untyped, TokenType::Access).unwrap();

        assert_invalid(service.verify_access(&token));
    }

    #[test]
    fn test_missing_subject() {
        let service = service();
        let anonymous = Claims {
            sub: None,
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
            token_type: Some(TokenType::Access),
        };
        let token = service.sign(&anonymous, TokenType::Access).unwrap();

        assert_invalid(service.verify_access(&token));
    }

    #[test]
    fn test_unknown_subject() {
        let service = service();
        let token = service.issue_access("deleted-user").unwrap();

        assert_invalid(service.verify_access(&token));
    }

    #[test]
    fn test_expired_tokens() {
        let service = service();
        let issued = Utc::now() - Duration::minutes(31);
        assert_invalid(service.verify_access(&service.issue_access_at("admin", issued).unwrap()));

        let issued = Utc::now() - Duration::days(8);
        assert_invalid(service.verify_refresh(&service.issue_refresh_at("admin", issued).unwrap()));

        // Still inside the window.
        let issued = Utc::now() - Duration::minutes(29);
        assert!(service
            .verify_access(&service.issue_access_at("admin", issued).unwrap())
            .is_ok());
    }

    #[test]
    fn test_tampered_and_malformed_tokens() {
        let service = service();
        let admin = service.issue_access("admin").unwrap();
        let user = service.issue_access("user").unwrap();

        // admin's header and signature around user's payload
        let admin_parts: Vec<&str> = admin.split('.').collect();
        let user_parts: Vec<&str> = user.split('.').collect();
        let spliced = format!("{}.{}.{}", admin_parts[0], user_parts[1], admin_parts[2]);
        assert_invalid(service.verify_access(&spliced));

        assert_invalid(service.verify_access(""));
        assert_invalid(service.verify_access("not-a-jwt"));
        assert_invalid(service.verify_access("a.b.c"));
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let service = service();
        let mut other_settings = settings();
        other_settings.access_secret = "someone-elses-secret".into();
        let other = TokenService::new(
            other_settings,
            Arc::new(InMemoryCredentialStore::from_users(vec![User::new(
                "admin",
                "unused",
                Role::Admin,
            )])),
        );

        assert_invalid(service.verify_access(&other.issue_access("admin").unwrap()));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let mut long_lived = settings();
        long_lived.refresh_ttl = Duration::days(365);
        let service = TokenService::new(
            long_lived,
            Arc::new(InMemoryCredentialStore::from_users(vec![User::new(
                "admin",
                "unused",
                Role::Admin,
            )])),
        );

        match service.issue_refresh_at("admin", DateTime::<Utc>::MAX_UTC) {
            Err(AppError::InternalServerError(msg)) => assert!(msg.contains("refresh")),
            other => panic!("expected InternalServerError, got {:?}", other),
        }
        assert!(service.issue_refresh("admin").is_ok());
    }

    #[test]
    fn test_many_subjects_resolve_without_cross_talk() {
        let users: Vec<User> = (0..1000)
            .map(|i| User::new(format!("user-{}", i), "unused", Role::User))
            .collect();
        let service = service_with(users);

        for i in 0..1000 {
            let subject = format!("user-{}", i);
            let token = service.issue_access(&subject).unwrap();
            assert_eq!(service.verify_access(&token).unwrap().username, subject);
        }
    }
}
