use crate::application_port::{AccessTokenClaims, AuthError, TokenCodec};
use crate::domain_model::{AccessToken, AccessTokenId, UserId};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_ttl: Duration,
    pub signing_key: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AccessClaims {
    pub sub: String,
    pub jti: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

fn encode_access(
    uid: UserId,
    jti: AccessTokenId,
    cfg: &JwtConfig,
) -> Result<(String, DateTime<Utc>), AuthError> {
    let iat_dt = Utc::now();
    let exp_dt = iat_dt + cfg.access_ttl;
    let claims = AccessClaims {
        sub: uid.to_string(),
        jti: jti.to_string(),
        iat: iat_dt.timestamp(),
        nbf: iat_dt.timestamp(),
        exp: exp_dt.timestamp(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&cfg.signing_key),
    )
    .map_err(|e| AuthError::Internal(e.to_string()))?;
    Ok((token, exp_dt))
}

fn decode_access(token: &str, cfg: &JwtConfig, check_exp: bool) -> Result<AccessClaims, AuthError> {
    let mut v = Validation::new(Algorithm::HS256);
    // zero leeway keeps expiry boundaries exact
    v.leeway = 0;
    v.validate_exp = check_exp;
    v.validate_nbf = check_exp;
    let data = decode::<AccessClaims>(token, &DecodingKey::from_secret(&cfg.signing_key), &v)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::ImmatureSignature => AuthError::NotYetValid,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName => AuthError::InvalidSignature,
            _ => AuthError::Malformed,
        })?;
    Ok(data.claims)
}

fn to_verified_claims(raw: AccessClaims) -> Result<AccessTokenClaims, AuthError> {
    let user_id = raw.sub.parse::<UserId>().map_err(|_| AuthError::Malformed)?;
    let token_id = raw
        .jti
        .parse::<AccessTokenId>()
        .map_err(|_| AuthError::Malformed)?;
    let ts = |secs: i64| DateTime::from_timestamp(secs, 0).ok_or(AuthError::Malformed);
    Ok(AccessTokenClaims {
        user_id,
        token_id,
        issued_at: ts(raw.iat)?,
        not_before: ts(raw.nbf)?,
        expires_at: ts(raw.exp)?,
    })
}

pub struct JwtHs256Codec {
    cfg: JwtConfig,
}

impl JwtHs256Codec {
    pub fn new(cfg: JwtConfig) -> Self {
        JwtHs256Codec { cfg }
    }
}

#[async_trait::async_trait]
impl TokenCodec for JwtHs256Codec {
    async fn mint_access_token(
        &self,
        user: UserId,
        token_id: AccessTokenId,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError> {
        let (token, exp_dt) = encode_access(user, token_id, &self.cfg)?;
        Ok((AccessToken(token), exp_dt))
    }

    async fn verify_access_token(
        &self,
        token: &AccessToken,
    ) -> Result<AccessTokenClaims, AuthError> {
        let claims = decode_access(&token.0, &self.cfg, true)?;
        to_verified_claims(claims)
    }

    async fn verify_access_token_allow_expired(
        &self,
        token: &AccessToken,
    ) -> Result<AccessTokenClaims, AuthError> {
        let claims = decode_access(&token.0, &self.cfg, false)?;
        to_verified_claims(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec() -> JwtHs256Codec {
        JwtHs256Codec::new(JwtConfig {
            access_ttl: Duration::from_secs(900),
            signing_key: b"test-signing-key".to_vec(),
        })
    }

    fn encode_raw(claims: &AccessClaims, key: &[u8]) -> AccessToken {
        let token = encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(key),
        )
        .unwrap();
        AccessToken(token)
    }

    #[tokio::test]
    async fn mint_then_verify_returns_matching_claims() {
        let codec = test_codec();
        let user = UserId(uuid::Uuid::new_v4());
        let token_id = AccessTokenId::generate();

        let (token, exp_dt) = codec.mint_access_token(user, token_id).await.unwrap();
        let claims = codec.verify_access_token(&token).await.unwrap();

        assert_eq!(claims.user_id, user);
        assert_eq!(claims.token_id, token_id);
        assert_eq!(claims.expires_at.timestamp(), exp_dt.timestamp());
        assert!(claims.not_before <= Utc::now());
    }

    #[tokio::test]
    async fn verify_rejects_foreign_signature() {
        let codec = test_codec();
        let other = JwtHs256Codec::new(JwtConfig {
            access_ttl: Duration::from_secs(900),
            signing_key: b"some-other-key".to_vec(),
        });
        let (token, _) = other
            .mint_access_token(UserId(uuid::Uuid::new_v4()), AccessTokenId::generate())
            .await
            .unwrap();

        let err = codec.verify_access_token(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[tokio::test]
    async fn verify_rejects_garbage() {
        let codec = test_codec();
        let err = codec
            .verify_access_token(&AccessToken("not-a-jwt".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Malformed));
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let codec = test_codec();
        let now = Utc::now().timestamp();
        let token = encode_raw(
            &AccessClaims {
                sub: UserId(uuid::Uuid::new_v4()).to_string(),
                jti: AccessTokenId::generate().to_string(),
                iat: now - 3600,
                nbf: now - 3600,
                exp: now - 60,
            },
            b"test-signing-key",
        );

        let err = codec.verify_access_token(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[tokio::test]
    async fn verify_rejects_not_yet_valid_token() {
        let codec = test_codec();
        let now = Utc::now().timestamp();
        let token = encode_raw(
            &AccessClaims {
                sub: UserId(uuid::Uuid::new_v4()).to_string(),
                jti: AccessTokenId::generate().to_string(),
                iat: now,
                nbf: now + 3600,
                exp: now + 7200,
            },
            b"test-signing-key",
        );

        let err = codec.verify_access_token(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::NotYetValid));
    }

    #[tokio::test]
    async fn allow_expired_accepts_expired_but_not_foreign_tokens() {
        let codec = test_codec();
        let user = UserId(uuid::Uuid::new_v4());
        let now = Utc::now().timestamp();
        let expired = encode_raw(
            &AccessClaims {
                sub: user.to_string(),
                jti: AccessTokenId::generate().to_string(),
                iat: now - 3600,
                nbf: now - 3600,
                exp: now - 60,
            },
            b"test-signing-key",
        );

        let claims = codec
            .verify_access_token_allow_expired(&expired)
            .await
            .unwrap();
        assert_eq!(claims.user_id, user);

        let foreign = encode_raw(
            &AccessClaims {
                sub: user.to_string(),
                jti: AccessTokenId::generate().to_string(),
                iat: now,
                nbf: now,
                exp: now + 3600,
            },
            b"wrong-key",
        );
        let err = codec
            .verify_access_token_allow_expired(&foreign)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }
}
