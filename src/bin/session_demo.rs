/// Example demonstrating the session lifecycle through the public server
/// interfaces, against the in-memory backend (no external services needed).
///
/// $ cargo run --bin session_demo
use gatehouse::application_port::AuthError;
use gatehouse::domain_model::UserId;
use gatehouse::server::{MailJob, Server};
use gatehouse::settings::*;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::new("session_demo=debug,gatehouse=debug");

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let settings = Settings {
        auth: Auth {
            backend: "real".to_string(),
            signing_key: "session-demo-key".to_string(),
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
            filter: "debug".to_string(),
        },
    };
    let server = Server::try_new(&settings).await?;

    let user = UserId(uuid::Uuid::new_v4());
    let fingerprint = "demo-device";

    // login
    let tokens = server
        .authorization_service
        .create_session(user, fingerprint)
        .await?;
    tracing::debug!("session created: {:?}", tokens);

    // bearer check
    let claims = server
        .authorization_service
        .validate_access_token(&tokens.access_token)
        .await?;
    tracing::debug!("access token valid for {}", claims.user_id);

    // rotation
    let rotated = server
        .authorization_service
        .refresh_session(&tokens.refresh_token.0, fingerprint)
        .await?;
    tracing::debug!("session rotated: {:?}", rotated);

    // the old refresh token is burned
    let replay = server
        .authorization_service
        .refresh_session(&tokens.refresh_token.0, fingerprint)
        .await;
    assert!(matches!(replay, Err(AuthError::SessionNotFound)));
    tracing::debug!("replay of the old refresh token rejected");

    // email confirmation round trip
    let confirm_token = server
        .verification_service
        .create_email_confirm_token(user)
        .await?;
    server.dispatch_mail(MailJob::EmailConfirm {
        to_address: "demo@example.com".to_string(),
        token: confirm_token.clone(),
    });
    let confirmed = server
        .verification_service
        .verify_email_confirm_token(&confirm_token)
        .await?;
    tracing::debug!("email confirmed for {}", confirmed);

    // logout
    server
        .authorization_service
        .revoke_session(&rotated.access_token)
        .await?;
    tracing::debug!("session revoked");

    server.shutdown().await;

    Ok(())
}
