use std::fmt;

/// Key namespace for one-shot verification tokens. Keeps an email-confirm
/// token and a password-reset token with the same value from being
/// interchangeable.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum VerificationPurpose {
    EmailConfirm,
    PasswordReset,
}

impl VerificationPurpose {
    pub fn key_prefix(&self) -> &'static str {
        match self {
            VerificationPurpose::EmailConfirm => "eConf",
            VerificationPurpose::PasswordReset => "pReset",
        }
    }
}

impl fmt::Display for VerificationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_prefix())
    }
}
