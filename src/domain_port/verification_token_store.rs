use crate::domain_model::{UserId, VerificationPurpose};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum VerificationStoreError {
    #[error("token not found or expired")]
    NotFound,
    #[error("store operation timed out")]
    Timeout,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Binds a random opaque token string to a subject id with a fixed TTL,
/// namespaced by purpose.
#[async_trait::async_trait]
pub trait VerificationTokenStore: Send + Sync {
    async fn put(
        &self,
        purpose: VerificationPurpose,
        token: &str,
        user_id: UserId,
        ttl: Duration,
    ) -> Result<(), VerificationStoreError>;

    async fn get(
        &self,
        purpose: VerificationPurpose,
        token: &str,
    ) -> Result<UserId, VerificationStoreError>;

    /// Atomic one-shot consume: the token is deleted the instant it
    /// resolves, before the caller sees the subject id.
    async fn take(
        &self,
        purpose: VerificationPurpose,
        token: &str,
    ) -> Result<UserId, VerificationStoreError>;

    async fn delete(
        &self,
        purpose: VerificationPurpose,
        token: &str,
    ) -> Result<(), VerificationStoreError>;
}
