use crate::domain_model::{AccessTokenId, RefreshToken, Session, UserId};
use crate::domain_port::{SessionStore, SessionStoreError};
use dashmap::DashMap;
use std::collections::HashSet;

/// Process-lifetime session store for tests and the `memory` backend.
/// No passive expiry; the redis backend is the one that enforces TTLs.
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
    access_tokens: DashMap<AccessTokenId, RefreshToken>,
    user_sessions: DashMap<UserId, HashSet<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore {
            sessions: DashMap::new(),
            access_tokens: DashMap::new(),
            user_sessions: DashMap::new(),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn put_session_and_access_token(
        &self,
        session: &Session,
        refresh_token: &RefreshToken,
    ) -> Result<(), SessionStoreError> {
        self.sessions
            .insert(refresh_token.0.clone(), session.clone());
        self.access_tokens
            .insert(session.access_token_id, refresh_token.clone());
        self.user_sessions
            .entry(session.user_id)
            .or_default()
            .insert(refresh_token.0.clone());
        Ok(())
    }

    async fn get_session(&self, refresh_token: &RefreshToken) -> Result<Session, SessionStoreError> {
        self.sessions
            .get(&refresh_token.0)
            .map(|entry| entry.value().clone())
            .ok_or(SessionStoreError::NotFound)
    }

    async fn take_session(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<Session, SessionStoreError> {
        // remove is the atomic arbiter: one concurrent caller wins
        self.sessions
            .remove(&refresh_token.0)
            .map(|(_, session)| session)
            .ok_or(SessionStoreError::NotFound)
    }

    async fn delete_session(&self, refresh_token: &RefreshToken) -> Result<(), SessionStoreError> {
        self.sessions.remove(&refresh_token.0);
        Ok(())
    }

    async fn get_access_token_data(
        &self,
        token_id: &AccessTokenId,
    ) -> Result<RefreshToken, SessionStoreError> {
        self.access_tokens
            .get(token_id)
            .map(|entry| entry.value().clone())
            .ok_or(SessionStoreError::NotFound)
    }

    async fn delete_access_token(
        &self,
        token_id: &AccessTokenId,
    ) -> Result<(), SessionStoreError> {
        self.access_tokens.remove(token_id);
        Ok(())
    }

    async fn delete_user_to_session(
        &self,
        user_id: UserId,
        refresh_token: &RefreshToken,
    ) -> Result<(), SessionStoreError> {
        if let Some(mut entry) = self.user_sessions.get_mut(&user_id) {
            entry.remove(&refresh_token.0);
        }
        Ok(())
    }
}
