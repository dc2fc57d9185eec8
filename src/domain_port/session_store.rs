use crate::domain_model::{AccessTokenId, RefreshToken, Session, UserId};

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session not found")]
    NotFound,
    #[error("session state inconsistent: {0}")]
    Inconsistent(String),
    #[error("store operation timed out")]
    Timeout,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Three correlated mappings: refresh token -> session, access-token id ->
/// refresh token, and user id -> set of active refresh tokens. The store is
/// the single source of truth; services never cache entries, so deletion
/// takes effect on the next validation.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Write refresh token -> session and access-token id -> refresh token,
    /// and register the refresh token in the per-user session set. The two
    /// main writes are best-effort together: if the pointer write fails
    /// after the session write succeeded, the result is `Inconsistent` and
    /// the caller may force a re-login.
    async fn put_session_and_access_token(
        &self,
        session: &Session,
        refresh_token: &RefreshToken,
    ) -> Result<(), SessionStoreError>;

    async fn get_session(&self, refresh_token: &RefreshToken) -> Result<Session, SessionStoreError>;

    /// Atomic get-and-delete. Of two concurrent callers presenting the same
    /// refresh token, exactly one obtains the session; the other gets
    /// `NotFound`. The arbiter is the store itself, not the service.
    async fn take_session(&self, refresh_token: &RefreshToken)
    -> Result<Session, SessionStoreError>;

    async fn delete_session(&self, refresh_token: &RefreshToken) -> Result<(), SessionStoreError>;

    async fn get_access_token_data(
        &self,
        token_id: &AccessTokenId,
    ) -> Result<RefreshToken, SessionStoreError>;

    async fn delete_access_token(&self, token_id: &AccessTokenId)
    -> Result<(), SessionStoreError>;

    /// Remove one refresh token from the per-user active-session set.
    async fn delete_user_to_session(
        &self,
        user_id: UserId,
        refresh_token: &RefreshToken,
    ) -> Result<(), SessionStoreError>;
}
