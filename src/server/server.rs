use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_redis::*;
use crate::server::{MailDispatcher, MailJob};
use crate::settings::Settings;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct Server {
    pub authorization_service: Arc<dyn AuthorizationService>,
    pub verification_service: Arc<dyn VerificationService>,
    mail_dispatcher: Mutex<Option<MailDispatcher>>,
    cancel: CancellationToken,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let op_timeout = Duration::from_millis(settings.store.op_timeout_ms);
        let refresh_ttl = Duration::from_secs(settings.auth.refresh_token_ttl_secs);

        let (session_store, verification_store): (
            Arc<dyn SessionStore>,
            Arc<dyn VerificationTokenStore>,
        ) = match settings.store.backend.as_str() {
            "memory" => (
                Arc::new(MemorySessionStore::new()),
                Arc::new(MemoryVerificationTokenStore::new()),
            ),
            "redis" => {
                let client = redis::Client::open(settings.store.redis_url.as_str())?;
                let manager = client.get_connection_manager().await?;
                (
                    Arc::new(RedisSessionStore::new(
                        manager.clone(),
                        settings.store.key_prefix.clone(),
                        op_timeout,
                        refresh_ttl,
                    )),
                    Arc::new(RedisVerificationTokenStore::new(
                        manager,
                        settings.store.key_prefix.clone(),
                        op_timeout,
                    )),
                )
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let key = std::env::var("JWT_SIGNING_KEY")
            .unwrap_or_else(|_| settings.auth.signing_key.clone())
            .into_bytes();
        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(JwtConfig {
            access_ttl: Duration::from_secs(settings.auth.access_token_lifetime_secs),
            signing_key: key,
        }));

        let authorization_service: Arc<dyn AuthorizationService> =
            match settings.auth.backend.as_str() {
                "fake" => Arc::new(FakeAuthorizationService::new()),
                "real" => Arc::new(RealAuthorizationService::new(token_codec, session_store)),
                other => return Err(anyhow::anyhow!("Unknown auth backend: {}", other)),
            };

        let generator: Arc<dyn RandomTokenGenerator> = Arc::new(RandTokenGenerator::new());
        let verification_service: Arc<dyn VerificationService> =
            Arc::new(RealVerificationService::new(
                generator,
                verification_store,
                VerificationConfig {
                    email_confirm_ttl: Duration::from_secs(
                        settings.verification.email_confirm_ttl_secs,
                    ),
                    password_reset_ttl: Duration::from_secs(
                        settings.verification.password_reset_ttl_secs,
                    ),
                    token_length: settings.verification.token_length,
                    token_digits: settings.verification.token_digits,
                    token_symbols: settings.verification.token_symbols,
                },
            ));

        let cancel = CancellationToken::new();
        let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new());
        let mail_dispatcher = MailDispatcher::start(
            mailer,
            settings.mail.queue_capacity,
            settings.mail.workers,
            cancel.clone(),
        );

        info!("server started");

        Ok(Self {
            authorization_service,
            verification_service,
            mail_dispatcher: Mutex::new(Some(mail_dispatcher)),
            cancel,
        })
    }

    /// Fire-and-forget: enqueue a mail job for the worker pool.
    pub fn dispatch_mail(&self, job: MailJob) {
        if let Ok(lock) = self.mail_dispatcher.lock() {
            if let Some(dispatcher) = lock.as_ref() {
                dispatcher.dispatch(job);
            }
        }
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        let dispatcher = self
            .mail_dispatcher
            .lock()
            .ok()
            .and_then(|mut lock| lock.take());
        if let Some(dispatcher) = dispatcher {
            dispatcher.shutdown().await;
        }
    }
}
