use crate::domain_model::{UserId, VerificationPurpose};
use crate::domain_port::{VerificationStoreError, VerificationTokenStore};
use crate::infra_redis::run_command;
use redis::aio::ConnectionManager;
use redis::{
    AsyncCommands, FromRedisValue, RedisError, RedisResult, RedisWrite, ToRedisArgs, Value,
};
use std::time::Duration;

pub struct RedisVerificationTokenStore {
    conn: ConnectionManager,
    prefix: String,
    op_timeout: Duration,
}

impl RedisVerificationTokenStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>, op_timeout: Duration) -> Self {
        RedisVerificationTokenStore {
            conn,
            prefix: prefix.into(),
            op_timeout,
        }
    }

    fn key(&self, purpose: VerificationPurpose, token: &str) -> String {
        format!("{}:{}:{}", self.prefix, purpose.key_prefix(), token)
    }
}

impl ToRedisArgs for UserId {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        out.write_arg(self.to_string().as_bytes())
    }
}

impl FromRedisValue for UserId {
    fn from_redis_value(v: &Value) -> RedisResult<Self> {
        let s: String = redis::from_redis_value(v)?;
        let user_id = s.parse::<UserId>().map_err(|e| {
            RedisError::from((
                redis::ErrorKind::TypeError,
                "invalid UserId string",
                e.to_string(),
            ))
        })?;
        Ok(user_id)
    }
}

#[async_trait::async_trait]
impl VerificationTokenStore for RedisVerificationTokenStore {
    async fn put(
        &self,
        purpose: VerificationPurpose,
        token: &str,
        user_id: UserId,
        ttl: Duration,
    ) -> Result<(), VerificationStoreError> {
        let conn = self.conn.clone();
        let key = self.key(purpose, token);
        let ttl_secs = ttl.as_secs().max(1);
        run_command(self.op_timeout, move || {
            let mut conn = conn.clone();
            let key = key.clone();
            async move { conn.set_ex::<_, _, ()>(&key, &user_id, ttl_secs).await }
        })
        .await
        .map_err(Into::into)
    }

    async fn get(
        &self,
        purpose: VerificationPurpose,
        token: &str,
    ) -> Result<UserId, VerificationStoreError> {
        let conn = self.conn.clone();
        let key = self.key(purpose, token);
        let value: Option<UserId> = run_command(self.op_timeout, move || {
            let mut conn = conn.clone();
            let key = key.clone();
            async move { conn.get::<_, Option<UserId>>(&key).await }
        })
        .await?;

        value.ok_or(VerificationStoreError::NotFound)
    }

    async fn take(
        &self,
        purpose: VerificationPurpose,
        token: &str,
    ) -> Result<UserId, VerificationStoreError> {
        // GETDEL keeps concurrent verification attempts from both spending
        // the same token
        let conn = self.conn.clone();
        let key = self.key(purpose, token);
        let value: Option<UserId> = run_command(self.op_timeout, move || {
            let mut conn = conn.clone();
            let key = key.clone();
            async move { conn.get_del::<_, Option<UserId>>(&key).await }
        })
        .await?;

        value.ok_or(VerificationStoreError::NotFound)
    }

    async fn delete(
        &self,
        purpose: VerificationPurpose,
        token: &str,
    ) -> Result<(), VerificationStoreError> {
        let conn = self.conn.clone();
        let key = self.key(purpose, token);
        run_command(self.op_timeout, move || {
            let mut conn = conn.clone();
            let key = key.clone();
            async move { conn.del::<_, ()>(&key).await }
        })
        .await
        .map_err(Into::into)
    }
}
