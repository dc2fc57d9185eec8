use crate::domain_model::{AccessTokenId, RefreshToken, Session, UserId};
use crate::domain_port::{SessionStore, SessionStoreError};
use crate::infra_redis::run_command;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::warn;

pub struct RedisSessionStore {
    conn: ConnectionManager,
    prefix: String,
    op_timeout: Duration,
    session_ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(
        conn: ConnectionManager,
        prefix: impl Into<String>,
        op_timeout: Duration,
        session_ttl: Duration,
    ) -> Self {
        RedisSessionStore {
            conn,
            prefix: prefix.into(),
            op_timeout,
            session_ttl_secs: session_ttl.as_secs().max(1),
        }
    }

    fn session_key(&self, refresh_token: &RefreshToken) -> String {
        format!("{}:sess:{}", self.prefix, refresh_token)
    }

    fn access_key(&self, token_id: &AccessTokenId) -> String {
        format!("{}:at:{}", self.prefix, token_id)
    }

    fn user_key(&self, user_id: UserId) -> String {
        format!("{}:usess:{}", self.prefix, user_id)
    }

    async fn set_with_ttl(&self, key: String, value: String) -> Result<(), SessionStoreError> {
        let conn = self.conn.clone();
        let ttl = self.session_ttl_secs;
        run_command(self.op_timeout, move || {
            let mut conn = conn.clone();
            let key = key.clone();
            let value = value.clone();
            async move { conn.set_ex::<_, _, ()>(&key, &value, ttl).await }
        })
        .await
        .map_err(Into::into)
    }

    async fn del_key(&self, key: String) -> Result<(), SessionStoreError> {
        let conn = self.conn.clone();
        run_command(self.op_timeout, move || {
            let mut conn = conn.clone();
            let key = key.clone();
            async move { conn.del::<_, ()>(&key).await }
        })
        .await
        .map_err(Into::into)
    }

    fn parse_session(raw: String) -> Result<Session, SessionStoreError> {
        serde_json::from_str(&raw).map_err(|e| SessionStoreError::Internal(e.to_string()))
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn put_session_and_access_token(
        &self,
        session: &Session,
        refresh_token: &RefreshToken,
    ) -> Result<(), SessionStoreError> {
        let payload = serde_json::to_string(session)
            .map_err(|e| SessionStoreError::Internal(e.to_string()))?;

        self.set_with_ttl(self.session_key(refresh_token), payload)
            .await?;

        // a dangling pointer after a half-failed pair is an inconsistency
        // the caller may surface; roll the session write back best-effort
        if let Err(e) = self
            .set_with_ttl(self.access_key(&session.access_token_id), refresh_token.0.clone())
            .await
        {
            let _ = self.del_key(self.session_key(refresh_token)).await;
            return Err(SessionStoreError::Inconsistent(e.to_string()));
        }

        // auxiliary index for per-user session listing; best effort
        let conn = self.conn.clone();
        let key = self.user_key(session.user_id);
        let member = refresh_token.0.clone();
        let ttl = self.session_ttl_secs;
        let result = run_command(self.op_timeout, move || {
            let mut conn = conn.clone();
            let key = key.clone();
            let member = member.clone();
            async move {
                conn.sadd::<_, _, ()>(&key, &member).await?;
                conn.expire::<_, ()>(&key, ttl as i64).await
            }
        })
        .await;
        if let Err(e) = result {
            warn!("failed to register session in user set: {:?}", e);
        }

        Ok(())
    }

    async fn get_session(&self, refresh_token: &RefreshToken) -> Result<Session, SessionStoreError> {
        let conn = self.conn.clone();
        let key = self.session_key(refresh_token);
        let raw: Option<String> = run_command(self.op_timeout, move || {
            let mut conn = conn.clone();
            let key = key.clone();
            async move { conn.get::<_, Option<String>>(&key).await }
        })
        .await?;

        Self::parse_session(raw.ok_or(SessionStoreError::NotFound)?)
    }

    async fn take_session(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<Session, SessionStoreError> {
        // GETDEL: the read and the delete are one command, so concurrent
        // rotations cannot both win
        let conn = self.conn.clone();
        let key = self.session_key(refresh_token);
        let raw: Option<String> = run_command(self.op_timeout, move || {
            let mut conn = conn.clone();
            let key = key.clone();
            async move { conn.get_del::<_, Option<String>>(&key).await }
        })
        .await?;

        Self::parse_session(raw.ok_or(SessionStoreError::NotFound)?)
    }

    async fn delete_session(&self, refresh_token: &RefreshToken) -> Result<(), SessionStoreError> {
        self.del_key(self.session_key(refresh_token)).await
    }

    async fn get_access_token_data(
        &self,
        token_id: &AccessTokenId,
    ) -> Result<RefreshToken, SessionStoreError> {
        let conn = self.conn.clone();
        let key = self.access_key(token_id);
        let raw: Option<String> = run_command(self.op_timeout, move || {
            let mut conn = conn.clone();
            let key = key.clone();
            async move { conn.get::<_, Option<String>>(&key).await }
        })
        .await?;

        raw.map(RefreshToken).ok_or(SessionStoreError::NotFound)
    }

    async fn delete_access_token(
        &self,
        token_id: &AccessTokenId,
    ) -> Result<(), SessionStoreError> {
        self.del_key(self.access_key(token_id)).await
    }

    async fn delete_user_to_session(
        &self,
        user_id: UserId,
        refresh_token: &RefreshToken,
    ) -> Result<(), SessionStoreError> {
        let conn = self.conn.clone();
        let key = self.user_key(user_id);
        let member = refresh_token.0.clone();
        run_command(self.op_timeout, move || {
            let mut conn = conn.clone();
            let key = key.clone();
            let member = member.clone();
            async move { conn.srem::<_, _, ()>(&key, &member).await }
        })
        .await
        .map_err(Into::into)
    }
}
