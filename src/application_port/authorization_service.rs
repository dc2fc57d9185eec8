use crate::domain_model::{AccessToken, AccessTokenId, SessionTokens, UserId};
use crate::domain_port::SessionStoreError;
use chrono::{DateTime, Utc};

/// `FingerprintMismatch` and `SessionNotFound` must be presented
/// identically by the boundary layer (both mean "log in again"); the
/// service keeps them distinct.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("token not active")]
    NotActive,
    #[error("session not found")]
    SessionNotFound,
    #[error("fingerprint does not match current one")]
    FingerprintMismatch,
    #[error("session state inconsistent: {0}")]
    SessionInconsistent(String),
    #[error("store operation timed out")]
    Timeout,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SessionStoreError> for AuthError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound => AuthError::SessionNotFound,
            SessionStoreError::Inconsistent(e) => AuthError::SessionInconsistent(e),
            SessionStoreError::Timeout => AuthError::Timeout,
            SessionStoreError::Unavailable(e) => AuthError::StoreUnavailable(e),
            SessionStoreError::Internal(e) => AuthError::Internal(e),
        }
    }
}

/// Claim set of a verified access token.
#[derive(Debug, Clone)]
pub struct AccessTokenClaims {
    pub user_id: UserId,
    pub token_id: AccessTokenId,
    pub issued_at: DateTime<Utc>,
    pub not_before: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait TokenCodec: Send + Sync {
    async fn mint_access_token(
        &self,
        user: UserId,
        token_id: AccessTokenId,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError>;

    /// Signature, expiry, and not-before all enforced.
    async fn verify_access_token(
        &self,
        token: &AccessToken,
    ) -> Result<AccessTokenClaims, AuthError>;

    /// Signature enforced, expiry tolerated. Revocation path only: a user
    /// must be able to log out with an already-expired access token.
    async fn verify_access_token_allow_expired(
        &self,
        token: &AccessToken,
    ) -> Result<AccessTokenClaims, AuthError>;
}

/// Session lifecycle: created, then either rotated (old credential triple
/// burned, new one issued), revoked, or passively expired.
#[async_trait::async_trait]
pub trait AuthorizationService: Send + Sync {
    async fn create_session(
        &self,
        user_id: UserId,
        fingerprint: &str,
    ) -> Result<SessionTokens, AuthError>;

    async fn validate_access_token(
        &self,
        access_token: &AccessToken,
    ) -> Result<AccessTokenClaims, AuthError>;

    async fn refresh_session(
        &self,
        current_refresh_token: &str,
        fingerprint: &str,
    ) -> Result<SessionTokens, AuthError>;

    async fn revoke_session(&self, access_token: &AccessToken) -> Result<(), AuthError>;
}
