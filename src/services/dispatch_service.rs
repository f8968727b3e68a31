use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::notification::NotificationDraft;
use crate::repositories::{JobDirectory, NotificationSink};

#[derive(Debug)]
pub enum SideEffect {
    Notify(NotificationDraft),
    IncrementApplicationCount(Uuid),
    Flush(oneshot::Sender<()>),
}

/// Runs best-effort side effects on a single worker, in the order they were
/// enqueued. Failures are logged and dropped.
#[derive(Clone)]
pub struct SideEffectDispatcher {
    tx: mpsc::UnboundedSender<SideEffect>,
}

impl SideEffectDispatcher {
    pub fn spawn(
        sink: Arc<dyn NotificationSink>,
        jobs: Arc<dyn JobDirectory>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<SideEffect>();

        let handle = tokio::spawn(async move {
            while let Some(effect) = rx.recv().await {
                run_effect(sink.as_ref(), jobs.as_ref(), effect).await;
            }
            tracing::debug!("Side-effect dispatcher stopped");
        });

        (Self { tx }, handle)
    }

    pub fn notify(&self, draft: NotificationDraft) {
        self.send(SideEffect::Notify(draft));
    }

    pub fn increment_application_count(&self, job_id: Uuid) {
        self.send(SideEffect::IncrementApplicationCount(job_id));
    }

    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Resolves once every effect enqueued before this call has run.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(SideEffect::Flush(done_tx));
        let _ = done_rx.await;
    }

    fn send(&self, effect: SideEffect) {
        if let Err(err) = self.tx.send(effect) {
            tracing::error!(effect = ?err.0, "Side-effect dispatcher is not running; effect dropped");
        }
    }
}

async fn run_effect(sink: &dyn NotificationSink, jobs: &dyn JobDirectory, effect: SideEffect) {
    match effect {
        SideEffect::Notify(draft) => {
            let recipient_id = draft.recipient_id;
            let category = draft.category;
            if let Err(e) = sink.notify(draft).await {
                tracing::warn!(
                    error = ?e,
                    %recipient_id,
                    %category,
                    "Failed to record notification"
                );
            }
        }
        SideEffect::IncrementApplicationCount(job_id) => {
            if let Err(e) = jobs.increment_application_count(job_id).await {
                tracing::warn!(error = ?e, %job_id, "Failed to increment job application count");
            }
        }
        SideEffect::Flush(done) => {
            let _ = done.send(());
        }
    }
}
