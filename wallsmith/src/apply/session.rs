use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use wallsmith_core::apply::ApplyMode;
use wallsmith_core::notification_types::{Message, MessageType};
use wallsmith_core::tasks::task_details::{keys, State, TaskResult};

use crate::notification::notify::Notifier;
use crate::tasks::scheduler::WorkScheduler;

use super::handoff::{ChooserOutcome, HandoffFlow};
use super::request::RequestBuilder;
use super::ApplyError;

/// Caller-visible callbacks for one apply operation.
///
/// All hooks default to doing nothing. `on_ready_for_external_handoff` is
/// the customization point: it runs right before the session launches the
/// handoff flow, and variants override only this hook.
#[async_trait]
pub trait ApplyEvents: Send + Sync {
    async fn on_enqueued(&self, _mode: ApplyMode) {}
    async fn on_applied(&self) {}
    async fn on_failure(&self) {}
    async fn on_ready_for_external_handoff(&self, _path: &str) {}
}

struct Subscription {
    task_id: Uuid,
    listener: Option<tokio::task::JoinHandle<()>>,
}

/// Observes at most one apply task at a time.
///
/// Submitting replaces the previous observation (cancelling it first), the
/// slot is cleared when a terminal state arrives or on explicit cancel, and
/// the terminal callback fires at most once per task handle. Nothing in here
/// blocks the caller; state updates are consumed by a spawned listener.
pub struct ApplySession {
    scheduler: Arc<dyn WorkScheduler>,
    builder: Arc<dyn RequestBuilder>,
    events: Arc<dyn ApplyEvents>,
    notifier: Arc<Notifier>,
    handoff: HandoffFlow,
    anchor: Option<String>,
    slot: Mutex<Option<Subscription>>,
}

impl ApplySession {
    pub fn new(
        scheduler: Arc<dyn WorkScheduler>,
        builder: Arc<dyn RequestBuilder>,
        events: Arc<dyn ApplyEvents>,
        notifier: Arc<Notifier>,
        handoff: HandoffFlow,
    ) -> Arc<Self> {
        Arc::new(Self {
            scheduler,
            builder,
            events,
            notifier,
            handoff,
            anchor: None,
            slot: Mutex::new(None),
        })
    }

    /// Anchor hint attached to every notification this session shows.
    pub fn with_anchor(mut self: Arc<Self>, anchor: impl Into<String>) -> Arc<Self> {
        // Sessions are handed out as Arc; mutate before sharing.
        if let Some(session) = Arc::get_mut(&mut self) {
            session.anchor = Some(anchor.into());
        }
        self
    }

    /// Submits one apply operation and observes it until a terminal state.
    ///
    /// Any outstanding observation is cancelled first, so there is never
    /// more than one live subscription per session. A builder returning
    /// `None` is a silent no-op, reported as `false`. Returns immediately
    /// once the listener is registered; nothing here blocks on the task.
    #[instrument(skip(self))]
    pub async fn submit_and_observe(self: &Arc<Self>, source_url: &str, mode: ApplyMode) -> bool {
        self.cancel_outstanding().await;

        let Some(request) = self.builder.build(source_url, mode) else {
            return false;
        };

        let task_id = self.scheduler.enqueue(request).await;
        let Some(mut updates) = self.scheduler.observe(&task_id).await else {
            warn!("Task {} already has an observer, not watching it", task_id);
            return false;
        };

        // Claim the slot before the listener can possibly clear it.
        *self.slot.lock().await = Some(Subscription {
            task_id,
            listener: None,
        });

        let session = Arc::clone(self);
        let listener = tokio::spawn(async move {
            while let Some(update) = updates.recv().await {
                match update.state {
                    State::Enqueued => {
                        // May arrive more than once; purely informational.
                        let message_type = if mode.is_external() {
                            MessageType::PreparingExternalApply
                        } else {
                            MessageType::ApplyEnqueued(mode)
                        };
                        session.show(message_type).await;
                        session.events.on_enqueued(mode).await;
                    }
                    State::Running => {}
                    State::Succeeded => {
                        session
                            .handle_success(task_id, update.result.unwrap_or_default())
                            .await;
                        break;
                    }
                    State::Failed => {
                        session.handle_failure(ApplyError::TaskFailed).await;
                        session.clear_slot(task_id).await;
                        break;
                    }
                    State::Cancelled => {
                        // Cancellations are caller-initiated; stop silently.
                        debug!("Observation of task {} ended by cancellation", task_id);
                        session.clear_slot(task_id).await;
                        break;
                    }
                }
            }
        });

        let mut slot = self.slot.lock().await;
        match slot.as_mut() {
            Some(subscription) if subscription.task_id == task_id => {
                subscription.listener = Some(listener);
            }
            // The listener already finished and cleared the slot.
            _ => {}
        }
        true
    }

    /// Cancels the outstanding observation, if any. Idempotent.
    pub async fn cancel_outstanding(&self) {
        let subscription = self.slot.lock().await.take();
        if let Some(subscription) = subscription {
            if let Some(listener) = subscription.listener {
                listener.abort();
            }
            self.scheduler.cancel(&subscription.task_id).await;
        }
    }

    /// Feed a chooser result back into the session. Results whose
    /// correlation code does not match the pending handoff are ignored.
    pub async fn on_handoff_result(&self, code: Uuid, outcome: ChooserOutcome) {
        if !self.handoff.claim(code).await {
            debug!("Ignoring chooser result with unmatched correlation code {code}");
            return;
        }
        match outcome {
            ChooserOutcome::Dismissed => {
                self.handle_failure(ApplyError::TaskFailed).await;
            }
            ChooserOutcome::Handled => {
                self.show(MessageType::WallpaperApplied).await;
                self.events.on_applied().await;
            }
        }
    }

    async fn handle_success(&self, task_id: Uuid, result: TaskResult) {
        let path = result
            .get_text(keys::DOWNLOAD_PATH)
            .unwrap_or_default()
            .to_string();
        let option = result.get_int(keys::APPLY_OPTION).unwrap_or(-1);

        if option == ApplyMode::External.as_int() {
            self.events.on_ready_for_external_handoff(&path).await;
            // The task's job ended with the file; observation stops here no
            // matter how the handoff goes.
            self.clear_slot(task_id).await;
            self.scheduler.cancel(&task_id).await;
            if let Err(err) = self.handoff.begin(Path::new(&path)).await {
                self.handle_failure(err).await;
            }
        } else {
            self.show(MessageType::WallpaperApplied).await;
            self.events.on_applied().await;
            self.clear_slot(task_id).await;
        }
    }

    async fn handle_failure(&self, cause: ApplyError) {
        // The caller gets one generic failure signal; the cause is logged.
        warn!("Apply operation failed: {}", cause);
        self.show(MessageType::ApplyFailed).await;
        self.events.on_failure().await;
    }

    /// Clears the slot if it still belongs to `task_id`. Used by the
    /// listener itself, so it must not abort anything.
    async fn clear_slot(&self, task_id: Uuid) {
        let mut slot = self.slot.lock().await;
        if slot.as_ref().is_some_and(|s| s.task_id == task_id) {
            *slot = None;
        }
    }

    async fn show(&self, message_type: MessageType) {
        let mut message = Message::new(message_type);
        if let Some(anchor) = &self.anchor {
            message = message.with_anchor(anchor.clone());
        }
        self.notifier.notify(&message).await;
    }
}
