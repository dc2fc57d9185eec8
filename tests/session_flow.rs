use gatehouse::application_port::{AuthError, VerificationError};
use gatehouse::domain_model::UserId;
use gatehouse::server::Server;
use gatehouse::settings::*;

fn memory_settings() -> Settings {
    Settings {
        auth: Auth {
            backend: "real".to_string(),
            signing_key: "integration-test-key".to_string(),
            access_token_lifetime_secs: 900,
            refresh_token_ttl_secs: 3600,
        },
        verification: Verification {
            email_confirm_ttl_secs: 3600,
            password_reset_ttl_secs: 600,
            token_length: 20,
            token_digits: 5,
            token_symbols: 0,
        },
        store: Store {
            backend: "memory".to_string(),
            redis_url: String::new(),
            key_prefix: "auth".to_string(),
            op_timeout_ms: 500,
        },
        mail: Mail {
            queue_capacity: 16,
            workers: 1,
        },
        log: Log {
            filter: "info".to_string(),
        },
    }
}

#[tokio::test]
async fn full_session_lifecycle() {
    let server = Server::try_new(&memory_settings()).await.unwrap();
    let auth = &server.authorization_service;

    let user = UserId(uuid::Uuid::new_v4());

    let tokens = auth.create_session(user, "fp-A").await.unwrap();
    assert!(!tokens.access_token.0.is_empty());
    assert!(!tokens.refresh_token.0.is_empty());

    let claims = auth.validate_access_token(&tokens.access_token).await.unwrap();
    assert_eq!(claims.user_id, user);

    let rotated = auth
        .refresh_session(&tokens.refresh_token.0, "fp-A")
        .await
        .unwrap();
    assert_ne!(rotated.refresh_token, tokens.refresh_token);
    assert_ne!(rotated.access_token.0, tokens.access_token.0);

    let replay = auth.refresh_session(&tokens.refresh_token.0, "fp-A").await;
    assert!(matches!(replay, Err(AuthError::SessionNotFound)));

    auth.revoke_session(&rotated.access_token).await.unwrap();
    let revoked = auth.validate_access_token(&rotated.access_token).await;
    assert!(matches!(revoked, Err(AuthError::NotActive)));

    server.shutdown().await;
}

#[tokio::test]
async fn stolen_refresh_token_is_burned_on_first_presentation() {
    let server = Server::try_new(&memory_settings()).await.unwrap();
    let auth = &server.authorization_service;

    let user = UserId(uuid::Uuid::new_v4());
    let tokens = auth.create_session(user, "fp-A").await.unwrap();

    let theft = auth.refresh_session(&tokens.refresh_token.0, "fp-B").await;
    assert!(matches!(theft, Err(AuthError::FingerprintMismatch)));

    // the legitimate client is forced to re-authenticate as well
    let retry = auth.refresh_session(&tokens.refresh_token.0, "fp-A").await;
    assert!(matches!(retry, Err(AuthError::SessionNotFound)));

    server.shutdown().await;
}

#[tokio::test]
async fn verification_tokens_are_single_use() {
    let server = Server::try_new(&memory_settings()).await.unwrap();
    let verification = &server.verification_service;

    let user = UserId(uuid::Uuid::new_v4());

    let token = verification.create_email_confirm_token(user).await.unwrap();
    assert_eq!(verification.verify_email_confirm_token(&token).await.unwrap(), user);
    let spent = verification.verify_email_confirm_token(&token).await;
    assert!(matches!(spent, Err(VerificationError::TokenNotFoundOrExpired)));

    let token = verification
        .create_password_reset_confirm_token(user)
        .await
        .unwrap();
    assert_eq!(
        verification
            .verify_password_reset_confirm_token(&token)
            .await
            .unwrap(),
        user
    );

    server.shutdown().await;
}
