use crate::domain_model::{UserId, VerificationPurpose};
use crate::domain_port::{VerificationStoreError, VerificationTokenStore};
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// In-process one-shot token store. TTLs are enforced on read.
pub struct MemoryVerificationTokenStore {
    tokens: DashMap<String, (UserId, Instant)>,
}

impl MemoryVerificationTokenStore {
    pub fn new() -> Self {
        MemoryVerificationTokenStore {
            tokens: DashMap::new(),
        }
    }

    fn key(purpose: VerificationPurpose, token: &str) -> String {
        format!("{}:{}", purpose.key_prefix(), token)
    }
}

impl Default for MemoryVerificationTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VerificationTokenStore for MemoryVerificationTokenStore {
    async fn put(
        &self,
        purpose: VerificationPurpose,
        token: &str,
        user_id: UserId,
        ttl: Duration,
    ) -> Result<(), VerificationStoreError> {
        let deadline = Instant::now() + ttl;
        self.tokens
            .insert(Self::key(purpose, token), (user_id, deadline));
        Ok(())
    }

    async fn get(
        &self,
        purpose: VerificationPurpose,
        token: &str,
    ) -> Result<UserId, VerificationStoreError> {
        let key = Self::key(purpose, token);
        if let Some(entry) = self.tokens.get(&key) {
            let (user_id, deadline) = *entry;
            drop(entry);
            if deadline > Instant::now() {
                return Ok(user_id);
            }
            self.tokens.remove(&key);
        }
        Err(VerificationStoreError::NotFound)
    }

    async fn take(
        &self,
        purpose: VerificationPurpose,
        token: &str,
    ) -> Result<UserId, VerificationStoreError> {
        match self.tokens.remove(&Self::key(purpose, token)) {
            Some((_, (user_id, deadline))) if deadline > Instant::now() => Ok(user_id),
            _ => Err(VerificationStoreError::NotFound),
        }
    }

    async fn delete(
        &self,
        purpose: VerificationPurpose,
        token: &str,
    ) -> Result<(), VerificationStoreError> {
        self.tokens.remove(&Self::key(purpose, token));
        Ok(())
    }
}
