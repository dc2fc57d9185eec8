use crate::domain_port::Mailer;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Debug, Clone)]
pub enum MailJob {
    EmailConfirm { to_address: String, token: String },
    ResetPasswordConfirm { to_address: String, token: String },
}

/// Bounded fire-and-forget mail queue. Producers never block: a saturated
/// queue drops the job with a warning.
pub struct MailDispatcher {
    tx: mpsc::Sender<MailJob>,
    workers: Vec<JoinHandle<()>>,
    cancel: CancellationToken,
}

impl MailDispatcher {
    pub fn start(
        mailer: Arc<dyn Mailer>,
        queue_capacity: usize,
        workers: usize,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let handles = (0..workers.max(1))
            .map(|_| {
                let mailer = mailer.clone();
                let rx = rx.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    loop {
                        let job = tokio::select! {
                            biased;
                            _ = cancel.cancelled() => break,
                            job = async { rx.lock().await.recv().await } => job,
                        };
                        match job {
                            Some(job) => deliver(mailer.as_ref(), job).await,
                            None => break,
                        }
                    }
                })
            })
            .collect();

        Self {
            tx,
            workers: handles,
            cancel,
        }
    }

    pub fn dispatch(&self, job: MailJob) {
        if self.tx.try_send(job).is_err() {
            warn!("mail queue saturated, dropping job");
        }
    }

    pub async fn shutdown(self) {
        self.cancel.cancel();
        drop(self.tx);
        for handle in self.workers {
            let _ = handle.await;
        }
    }
}

async fn deliver(mailer: &dyn Mailer, job: MailJob) {
    let result = match &job {
        MailJob::EmailConfirm { to_address, token } => {
            mailer.send_email_confirm(to_address, token).await
        }
        MailJob::ResetPasswordConfirm { to_address, token } => {
            mailer.send_reset_password_confirm(to_address, token).await
        }
    };
    if let Err(e) = result {
        warn!("mail delivery failed: {}", e);
    }
}
