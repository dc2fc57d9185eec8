use crate::domain_model::UserId;
use crate::domain_port::VerificationStoreError;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("token not found or expired")]
    TokenNotFoundOrExpired,
    #[error("store operation timed out")]
    Timeout,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<VerificationStoreError> for VerificationError {
    fn from(err: VerificationStoreError) -> Self {
        match err {
            VerificationStoreError::NotFound => VerificationError::TokenNotFoundOrExpired,
            VerificationStoreError::Timeout => VerificationError::Timeout,
            VerificationStoreError::Unavailable(e) => VerificationError::StoreUnavailable(e),
        }
    }
}

/// One-shot verification tokens: created on demand, consumed exactly once,
/// otherwise expired passively by the store.
#[async_trait::async_trait]
pub trait VerificationService: Send + Sync {
    async fn create_email_confirm_token(&self, user_id: UserId)
    -> Result<String, VerificationError>;

    async fn verify_email_confirm_token(&self, token: &str) -> Result<UserId, VerificationError>;

    async fn create_password_reset_confirm_token(
        &self,
        user_id: UserId,
    ) -> Result<String, VerificationError>;

    async fn verify_password_reset_confirm_token(
        &self,
        token: &str,
    ) -> Result<UserId, VerificationError>;
}
