use crate::application_port::{VerificationError, VerificationService};
use crate::domain_model::{UserId, VerificationPurpose};
use crate::domain_port::{RandomTokenGenerator, VerificationStoreError, VerificationTokenStore};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct VerificationConfig {
    pub email_confirm_ttl: Duration,
    pub password_reset_ttl: Duration,
    pub token_length: usize,
    pub token_digits: usize,
    pub token_symbols: usize,
}

pub struct RealVerificationService {
    generator: Arc<dyn RandomTokenGenerator>,
    token_store: Arc<dyn VerificationTokenStore>,
    cfg: VerificationConfig,
}

impl RealVerificationService {
    pub fn new(
        generator: Arc<dyn RandomTokenGenerator>,
        token_store: Arc<dyn VerificationTokenStore>,
        cfg: VerificationConfig,
    ) -> Self {
        Self {
            generator,
            token_store,
            cfg,
        }
    }

    fn ttl(&self, purpose: VerificationPurpose) -> Duration {
        match purpose {
            VerificationPurpose::EmailConfirm => self.cfg.email_confirm_ttl,
            VerificationPurpose::PasswordReset => self.cfg.password_reset_ttl,
        }
    }

    async fn create_token(
        &self,
        purpose: VerificationPurpose,
        user_id: UserId,
    ) -> Result<String, VerificationError> {
        let token = self
            .generator
            .generate(
                self.cfg.token_length,
                self.cfg.token_digits,
                self.cfg.token_symbols,
                true,
                false,
            )
            .await
            .map_err(|e| VerificationError::Internal(e.to_string()))?;

        self.token_store
            .put(purpose, &token, user_id, self.ttl(purpose))
            .await?;

        Ok(token)
    }

    async fn consume_token(
        &self,
        purpose: VerificationPurpose,
        token: &str,
    ) -> Result<UserId, VerificationError> {
        // one-shot: the token is spent the instant it resolves
        match self.token_store.take(purpose, token).await {
            Ok(user_id) => Ok(user_id),
            Err(VerificationStoreError::NotFound) => Err(VerificationError::TokenNotFoundOrExpired),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl VerificationService for RealVerificationService {
    async fn create_email_confirm_token(
        &self,
        user_id: UserId,
    ) -> Result<String, VerificationError> {
        self.create_token(VerificationPurpose::EmailConfirm, user_id)
            .await
    }

    async fn verify_email_confirm_token(&self, token: &str) -> Result<UserId, VerificationError> {
        self.consume_token(VerificationPurpose::EmailConfirm, token)
            .await
    }

    async fn create_password_reset_confirm_token(
        &self,
        user_id: UserId,
    ) -> Result<String, VerificationError> {
        self.create_token(VerificationPurpose::PasswordReset, user_id)
            .await
    }

    async fn verify_password_reset_confirm_token(
        &self,
        token: &str,
    ) -> Result<UserId, VerificationError> {
        self.consume_token(VerificationPurpose::PasswordReset, token)
            .await
    }
}
