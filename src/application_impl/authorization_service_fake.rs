use crate::application_port::{AccessTokenClaims, AuthError, AuthorizationService};
use crate::domain_model::{AccessToken, AccessTokenId, RefreshToken, SessionTokens, UserId};
use chrono::{Duration, Utc};

#[derive(Debug)]
pub struct FakeAuthorizationService;

impl FakeAuthorizationService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FakeAuthorizationService {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal fake implementation for basic use only.
// Extend to simulate more error cases and configurable responses when needed.
#[async_trait::async_trait]
impl AuthorizationService for FakeAuthorizationService {
    async fn create_session(
        &self,
        user_id: UserId,
        fingerprint: &str,
    ) -> Result<SessionTokens, AuthError> {
        Ok(fake_tokens(user_id, fingerprint))
    }

    async fn validate_access_token(
        &self,
        access_token: &AccessToken,
    ) -> Result<AccessTokenClaims, AuthError> {
        let rest = access_token
            .0
            .strip_prefix("fake-access-token:")
            .ok_or(AuthError::Malformed)?;
        let (uid, _) = rest.split_once(':').ok_or(AuthError::Malformed)?;
        let user_id = uid.parse::<UserId>().map_err(|_| AuthError::Malformed)?;
        let now = Utc::now();
        Ok(AccessTokenClaims {
            user_id,
            token_id: fake_token_id(user_id),
            issued_at: now,
            not_before: now,
            expires_at: now + Duration::days(1),
        })
    }

    async fn refresh_session(
        &self,
        current_refresh_token: &str,
        fingerprint: &str,
    ) -> Result<SessionTokens, AuthError> {
        let rest = current_refresh_token
            .strip_prefix("fake-refresh-token:")
            .ok_or(AuthError::SessionNotFound)?;
        let (uid, fp) = rest.split_once(':').ok_or(AuthError::SessionNotFound)?;
        let user_id = uid
            .parse::<UserId>()
            .map_err(|_| AuthError::SessionNotFound)?;
        if fp != fingerprint {
            return Err(AuthError::FingerprintMismatch);
        }
        Ok(fake_tokens(user_id, fingerprint))
    }

    async fn revoke_session(&self, access_token: &AccessToken) -> Result<(), AuthError> {
        self.validate_access_token(access_token).await.map(|_| ())
    }
}

fn fake_token_id(user_id: UserId) -> AccessTokenId {
    AccessTokenId(uuid::Uuid::new_v5(
        &uuid::Uuid::NAMESPACE_OID,
        user_id.to_string().as_bytes(),
    ))
}

fn fake_tokens(user_id: UserId, fingerprint: &str) -> SessionTokens {
    SessionTokens {
        access_token: AccessToken(format!("fake-access-token:{}:{}", user_id, fingerprint)),
        refresh_token: RefreshToken(format!("fake-refresh-token:{}:{}", user_id, fingerprint)),
        access_token_expires_at: Utc::now() + Duration::days(1),
    }
}
