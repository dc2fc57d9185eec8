use crate::domain_port::{SessionStoreError, VerificationStoreError};
use redis::RedisResult;
use std::future::Future;
use std::time::Duration;

mod session_store_redis;
mod verification_token_store_redis;

pub use session_store_redis::*;
pub use verification_token_store_redis::*;

#[derive(Debug)]
pub(crate) enum RedisOpError {
    Timeout,
    Unavailable(String),
}

impl From<RedisOpError> for SessionStoreError {
    fn from(err: RedisOpError) -> Self {
        match err {
            RedisOpError::Timeout => SessionStoreError::Timeout,
            RedisOpError::Unavailable(e) => SessionStoreError::Unavailable(e),
        }
    }
}

impl From<RedisOpError> for VerificationStoreError {
    fn from(err: RedisOpError) -> Self {
        match err {
            RedisOpError::Timeout => VerificationStoreError::Timeout,
            RedisOpError::Unavailable(e) => VerificationStoreError::Unavailable(e),
        }
    }
}

/// Runs one command under the configured deadline. Transient connection
/// loss gets exactly one immediate retry; everything else surfaces as-is.
pub(crate) async fn run_command<T, F, Fut>(op_timeout: Duration, op: F) -> Result<T, RedisOpError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = RedisResult<T>>,
{
    match tokio::time::timeout(op_timeout, op()).await {
        Err(_) => Err(RedisOpError::Timeout),
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) if e.is_io_error() || e.is_connection_dropped() => {
            match tokio::time::timeout(op_timeout, op()).await {
                Err(_) => Err(RedisOpError::Timeout),
                Ok(result) => result.map_err(|e| RedisOpError::Unavailable(e.to_string())),
            }
        }
        Ok(Err(e)) => Err(RedisOpError::Unavailable(e.to_string())),
    }
}
