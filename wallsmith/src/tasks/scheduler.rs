use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;
use uuid::Uuid;

use wallsmith_core::apply::ApplyMode;
use wallsmith_core::tasks::task_details::{StateUpdate, TaskResult};

/// A unit of background work. `Ok` maps to `Succeeded` with the returned
/// result, `Err` to `Failed`.
#[async_trait]
pub trait Job: Send + Sync {
    fn describe(&self) -> String;
    async fn run(&self) -> anyhow::Result<TaskResult>;
}

pub struct WorkRequest {
    pub id: Uuid,
    pub source_url: Url,
    pub mode: ApplyMode,
    pub job: Box<dyn Job>,
}

impl WorkRequest {
    pub fn new(source_url: Url, mode: ApplyMode, job: Box<dyn Job>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_url,
            mode,
            job,
        }
    }
}

impl std::fmt::Debug for WorkRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkRequest")
            .field("id", &self.id)
            .field("source_url", &self.source_url.as_str())
            .field("mode", &self.mode)
            .finish()
    }
}

/// The scheduler boundary the apply session talks to.
///
/// Updates for one handle are delivered strictly ordered, one at a time, on
/// a single channel; a handle supports at most one observer.
#[async_trait]
pub trait WorkScheduler: Send + Sync {
    async fn enqueue(&self, request: WorkRequest) -> Uuid;

    /// Hands out the observation channel for a handle. Returns `None` for
    /// unknown handles and for handles that already have an observer.
    async fn observe(&self, handle: &Uuid) -> Option<mpsc::Receiver<StateUpdate>>;

    /// Idempotent; safe to call for unknown or already-terminal handles.
    async fn cancel(&self, handle: &Uuid);
}
