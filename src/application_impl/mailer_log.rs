use crate::domain_port::{Mailer, MailerError};
use tracing::info;

/// Stand-in delivery backend: records the send in the log. SMTP transport
/// lives outside this subsystem.
#[derive(Debug)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Mailer for LogMailer {
    async fn send_email_confirm(&self, to_address: &str, token: &str) -> Result<(), MailerError> {
        info!("email confirm for {}: token {}", to_address, token);
        Ok(())
    }

    async fn send_reset_password_confirm(
        &self,
        to_address: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        info!("password reset confirm for {}: token {}", to_address, token);
        Ok(())
    }
}
