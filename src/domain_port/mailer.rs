#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// Outbound mail surface. Callers dispatch through the bounded queue in
/// `server::MailDispatcher` and never observe the result.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email_confirm(&self, to_address: &str, token: &str) -> Result<(), MailerError>;

    async fn send_reset_password_confirm(
        &self,
        to_address: &str,
        token: &str,
    ) -> Result<(), MailerError>;
}
