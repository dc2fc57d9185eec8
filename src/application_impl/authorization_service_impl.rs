use crate::application_port::{AccessTokenClaims, AuthError, AuthorizationService, TokenCodec};
use crate::domain_model::{AccessToken, AccessTokenId, RefreshToken, Session, SessionTokens, UserId};
use crate::domain_port::{SessionStore, SessionStoreError};
use std::sync::Arc;
use tracing::warn;

pub struct RealAuthorizationService {
    token_codec: Arc<dyn TokenCodec>,
    session_store: Arc<dyn SessionStore>,
}

impl RealAuthorizationService {
    pub fn new(token_codec: Arc<dyn TokenCodec>, session_store: Arc<dyn SessionStore>) -> Self {
        Self {
            token_codec,
            session_store,
        }
    }
}

#[async_trait::async_trait]
impl AuthorizationService for RealAuthorizationService {
    async fn create_session(
        &self,
        user_id: UserId,
        fingerprint: &str,
    ) -> Result<SessionTokens, AuthError> {
        let access_token_id = AccessTokenId::generate();
        let (access_token, access_token_expires_at) = self
            .token_codec
            .mint_access_token(user_id, access_token_id)
            .await?;

        let refresh_token = RefreshToken::generate();
        let session = Session {
            user_id,
            access_token_id,
            fingerprint: fingerprint.to_owned(),
        };
        self.session_store
            .put_session_and_access_token(&session, &refresh_token)
            .await?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
            access_token_expires_at,
        })
    }

    async fn validate_access_token(
        &self,
        access_token: &AccessToken,
    ) -> Result<AccessTokenClaims, AuthError> {
        let claims = self.token_codec.verify_access_token(access_token).await?;

        // a signature-valid token absent from the store has been revoked
        match self
            .session_store
            .get_access_token_data(&claims.token_id)
            .await
        {
            Ok(_) => Ok(claims),
            Err(SessionStoreError::NotFound) => Err(AuthError::NotActive),
            Err(e) => Err(e.into()),
        }
    }

    async fn refresh_session(
        &self,
        current_refresh_token: &str,
        fingerprint: &str,
    ) -> Result<SessionTokens, AuthError> {
        let current = RefreshToken(current_refresh_token.to_owned());

        // Burn the presented refresh token before anything else. Once it is
        // taken, replay is impossible even if the fingerprint check below
        // fails.
        let session = self.session_store.take_session(&current).await?;

        self.session_store
            .delete_user_to_session(session.user_id, &current)
            .await?;
        self.session_store
            .delete_access_token(&session.access_token_id)
            .await?;

        if session.fingerprint != fingerprint {
            return Err(AuthError::FingerprintMismatch);
        }

        self.create_session(session.user_id, fingerprint).await
    }

    async fn revoke_session(&self, access_token: &AccessToken) -> Result<(), AuthError> {
        // expiry is deliberately tolerated: logout must work with an
        // already-expired access token
        let claims = self
            .token_codec
            .verify_access_token_allow_expired(access_token)
            .await?;

        let refresh_token = match self
            .session_store
            .get_access_token_data(&claims.token_id)
            .await
        {
            Ok(rt) => rt,
            Err(SessionStoreError::NotFound) => return Err(AuthError::NotActive),
            Err(e) => return Err(e.into()),
        };

        self.session_store
            .delete_access_token(&claims.token_id)
            .await?;

        // best effort: revocation proceeds even when the session record is
        // already gone
        match self.session_store.get_session(&refresh_token).await {
            Ok(session) => {
                self.session_store
                    .delete_user_to_session(session.user_id, &refresh_token)
                    .await?;
            }
            Err(SessionStoreError::NotFound) => {}
            Err(e) => warn!("session lookup during revoke failed: {}", e),
        }

        self.session_store.delete_session(&refresh_token).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::{JwtConfig, JwtHs256Codec};
    use crate::application_impl::token_codec_impl::AccessClaims;
    use crate::infra_memory::MemorySessionStore;
    use chrono::Utc;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use std::time::Duration;

    const SIGNING_KEY: &[u8] = b"test-signing-key";

    fn service() -> (RealAuthorizationService, Arc<MemorySessionStore>) {
        let codec = Arc::new(JwtHs256Codec::new(JwtConfig {
            access_ttl: Duration::from_secs(900),
            signing_key: SIGNING_KEY.to_vec(),
        }));
        let store = Arc::new(MemorySessionStore::new());
        (
            RealAuthorizationService::new(codec, store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn create_then_validate_returns_subject() {
        let (svc, _) = service();
        let user = UserId(uuid::Uuid::new_v4());

        let tokens = svc.create_session(user, "fp-A").await.unwrap();
        assert!(!tokens.access_token.0.is_empty());
        assert!(!tokens.refresh_token.0.is_empty());

        let claims = svc.validate_access_token(&tokens.access_token).await.unwrap();
        assert_eq!(claims.user_id, user);
    }

    #[tokio::test]
    async fn revoked_token_is_not_active_despite_valid_signature() {
        let (svc, _) = service();
        let user = UserId(uuid::Uuid::new_v4());

        let tokens = svc.create_session(user, "fp-A").await.unwrap();
        svc.revoke_session(&tokens.access_token).await.unwrap();

        let err = svc
            .validate_access_token(&tokens.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotActive));
    }

    #[tokio::test]
    async fn refresh_rotates_and_burns_the_old_token() {
        let (svc, _) = service();
        let user = UserId(uuid::Uuid::new_v4());

        let first = svc.create_session(user, "fp-A").await.unwrap();
        let second = svc
            .refresh_session(&first.refresh_token.0, "fp-A")
            .await
            .unwrap();
        assert_ne!(first.refresh_token, second.refresh_token);
        assert_ne!(first.access_token.0, second.access_token.0);

        // the old access token no longer validates
        let err = svc
            .validate_access_token(&first.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotActive));

        // replaying the old refresh token fails
        let err = svc
            .refresh_session(&first.refresh_token.0, "fp-A")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));

        // the rotated pair works
        svc.validate_access_token(&second.access_token).await.unwrap();
    }

    #[tokio::test]
    async fn mismatched_fingerprint_burns_the_token_without_reissuing() {
        let (svc, _) = service();
        let user = UserId(uuid::Uuid::new_v4());

        let tokens = svc.create_session(user, "fp-A").await.unwrap();
        let err = svc
            .refresh_session(&tokens.refresh_token.0, "fp-B")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::FingerprintMismatch));

        // a single presentation invalidates the token, win or lose
        let err = svc
            .refresh_session(&tokens.refresh_token.0, "fp-A")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }

    #[tokio::test]
    async fn validate_rejects_store_absent_token() {
        let (svc, store) = service();
        let user = UserId(uuid::Uuid::new_v4());

        let tokens = svc.create_session(user, "fp-A").await.unwrap();
        let claims = svc.validate_access_token(&tokens.access_token).await.unwrap();
        store.delete_access_token(&claims.token_id).await.unwrap();

        let err = svc
            .validate_access_token(&tokens.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotActive));
    }

    #[tokio::test]
    async fn revoke_works_with_expired_access_token() {
        let (svc, store) = service();
        let user = UserId(uuid::Uuid::new_v4());

        let tokens = svc.create_session(user, "fp-A").await.unwrap();
        let claims = svc.validate_access_token(&tokens.access_token).await.unwrap();

        // same jti, same key, expiry in the past
        let now = Utc::now().timestamp();
        let expired = encode(
            &Header::new(Algorithm::HS256),
            &AccessClaims {
                sub: user.to_string(),
                jti: claims.token_id.to_string(),
                iat: now - 3600,
                nbf: now - 3600,
                exp: now - 60,
            },
            &EncodingKey::from_secret(SIGNING_KEY),
        )
        .unwrap();

        svc.revoke_session(&AccessToken(expired)).await.unwrap();

        let err = store
            .get_session(&tokens.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionStoreError::NotFound));
    }

    #[tokio::test]
    async fn revoke_twice_reports_not_active() {
        let (svc, _) = service();
        let user = UserId(uuid::Uuid::new_v4());

        let tokens = svc.create_session(user, "fp-A").await.unwrap();
        svc.revoke_session(&tokens.access_token).await.unwrap();

        let err = svc.revoke_session(&tokens.access_token).await.unwrap_err();
        assert!(matches!(err, AuthError::NotActive));
    }
}
