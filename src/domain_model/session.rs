use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier carried in an access token's `jti` claim. One per issued
/// access token; the session store tracks it so the token can be
/// invalidated before its natural expiry.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AccessTokenId(pub uuid::Uuid);

impl AccessTokenId {
    pub fn generate() -> Self {
        AccessTokenId(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for AccessTokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccessTokenId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(AccessTokenId)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken(pub String);

/// Opaque long-lived credential. Single-use: every successful refresh
/// replaces it together with its session.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RefreshToken(pub String);

impl RefreshToken {
    pub fn generate() -> Self {
        RefreshToken(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One authenticated login. Keyed in the store by its refresh token, not
/// by user id, so a user may hold several concurrent sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub access_token_id: AccessTokenId,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub access_token_expires_at: DateTime<Utc>,
}
