use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use wallsmith_core::tasks::task_details::{State, StateUpdate, TaskDetails};

use super::scheduler::{WorkRequest, WorkScheduler};

// Enough room for the full Enqueued/Running/terminal sequence plus a few
// re-reports; the worker never blocks on a slow observer.
const UPDATE_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug)]
pub struct TaskState {
    pub details: Arc<RwLock<TaskDetails>>,
    pub handle: Option<Arc<RwLock<tokio::task::JoinHandle<()>>>>,
    updates: mpsc::Sender<StateUpdate>,
    observer: Arc<Mutex<Option<mpsc::Receiver<StateUpdate>>>>,
}

/// In-process work scheduler: runs jobs on the tokio runtime and publishes
/// their state transitions on a per-task channel.
#[derive(Clone, Debug, Default)]
pub struct TaskManager {
    tasks: Arc<RwLock<HashMap<Uuid, Arc<TaskState>>>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_task_list(&self) -> Vec<TaskDetails> {
        let tasks = self.tasks.read().await;
        let mut task_list = Vec::new();
        for task_state in tasks.values() {
            let details = task_state.details.read().await;
            task_list.push(details.clone());
        }
        task_list
    }

    pub async fn get_task_details(&self, id: &Uuid) -> Option<TaskDetails> {
        let tasks = self.tasks.read().await;
        let task_state = tasks.get(id)?;
        let details = task_state.details.read().await;
        Some(details.clone())
    }

    async fn add_task(&self, id: Uuid, task_state: TaskState) {
        let mut tasks = self.tasks.write().await;
        tasks.insert(id, Arc::new(task_state));
    }

    /// Drops tasks that finished longer than `ttl` ago.
    #[instrument(skip(self))]
    pub async fn run_cleanup(&self, ttl: chrono::Duration) {
        let mut tasks = self.tasks.write().await;
        let mut to_remove = vec![];

        for (id, state) in tasks.iter() {
            let details = state.details.read().await;
            let expired = details.finish_time.is_some_and(|finish_time| {
                chrono::Utc::now().signed_duration_since(finish_time) > ttl
            });
            if details.state.is_terminal() && expired {
                if let Some(handle) = &state.handle {
                    handle.write().await.abort();
                }
                to_remove.push(*id);
            }
        }

        for id in to_remove {
            debug!("Removing finished task {}", id);
            tasks.remove(&id);
        }
    }
}

#[async_trait]
impl WorkScheduler for TaskManager {
    async fn enqueue(&self, request: WorkRequest) -> Uuid {
        let WorkRequest {
            id,
            source_url: _,
            mode,
            job,
        } = request;

        let mut initial = TaskDetails::new(job.describe(), mode);
        initial.id = id;
        let details = Arc::new(RwLock::new(initial));

        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        // Buffered before the worker even starts, so an observer attached
        // right after enqueue still sees the full history.
        let _ = tx.send(StateUpdate::new(State::Enqueued)).await;

        let handle = {
            let details = details.clone();
            let tx = tx.clone();

            tokio::task::spawn(async move {
                {
                    let mut details = details.write().await;
                    details.state = State::Running;
                }
                let _ = tx.send(StateUpdate::new(State::Running)).await;

                info!("Starting task {}: {}", id, job.describe());
                match job.run().await {
                    Ok(result) => {
                        {
                            let mut details = details.write().await;
                            details.state = State::Succeeded;
                            details.finish_time = Some(chrono::Utc::now());
                            details.result = result.clone();
                        }
                        let _ = tx.send(StateUpdate::succeeded(result)).await;
                    }
                    Err(err) => {
                        error!("Task {} failed: {:?}", id, err);
                        {
                            let mut details = details.write().await;
                            details.state = State::Failed;
                            details.finish_time = Some(chrono::Utc::now());
                        }
                        let _ = tx.send(StateUpdate::new(State::Failed)).await;
                    }
                }
            })
        };

        self.add_task(
            id,
            TaskState {
                details,
                handle: Some(Arc::new(RwLock::new(handle))),
                updates: tx,
                observer: Arc::new(Mutex::new(Some(rx))),
            },
        )
        .await;

        id
    }

    async fn observe(&self, handle: &Uuid) -> Option<mpsc::Receiver<StateUpdate>> {
        let task_state = {
            let tasks = self.tasks.read().await;
            tasks.get(handle).cloned()
        }?;
        let observer = task_state.observer.lock().await.take();
        observer
    }

    async fn cancel(&self, handle: &Uuid) {
        let task_state = {
            let tasks = self.tasks.read().await;
            tasks.get(handle).cloned()
        };
        let Some(task_state) = task_state else {
            return;
        };

        if let Some(join_handle) = &task_state.handle {
            join_handle.read().await.abort();
        }

        let mut details = task_state.details.write().await;
        if !details.state.is_terminal() {
            details.state = State::Cancelled;
            details.finish_time = Some(chrono::Utc::now());
            // Best effort; the observer may already be gone.
            let _ = task_state
                .updates
                .try_send(StateUpdate::new(State::Cancelled));
            debug!("Cancelled task {}", handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::scheduler::Job;
    use wallsmith_core::apply::ApplyMode;
    use wallsmith_core::tasks::task_details::{keys, TaskResult};

    struct InstantJob {
        result: anyhow::Result<TaskResult>,
    }

    impl InstantJob {
        fn ok(path: &str) -> Box<Self> {
            Box::new(Self {
                result: Ok(TaskResult::new().with_text(keys::DOWNLOAD_PATH, path)),
            })
        }

        fn failing() -> Box<Self> {
            Box::new(Self {
                result: Err(anyhow::anyhow!("boom")),
            })
        }
    }

    #[async_trait]
    impl Job for InstantJob {
        fn describe(&self) -> String {
            "instant job".to_string()
        }

        async fn run(&self) -> anyhow::Result<TaskResult> {
            match &self.result {
                Ok(result) => Ok(result.clone()),
                Err(err) => Err(anyhow::anyhow!("{err}")),
            }
        }
    }

    struct PendingJob;

    #[async_trait]
    impl Job for PendingJob {
        fn describe(&self) -> String {
            "pending job".to_string()
        }

        async fn run(&self) -> anyhow::Result<TaskResult> {
            futures_util::future::pending::<()>().await;
            unreachable!()
        }
    }

    fn request(job: Box<dyn Job>) -> WorkRequest {
        WorkRequest::new(
            url::Url::parse("https://walls.example/a.png").unwrap(),
            ApplyMode::Both,
            job,
        )
    }

    async fn collect_states(rx: &mut mpsc::Receiver<StateUpdate>) -> Vec<State> {
        let mut states = vec![];
        while let Some(update) = rx.recv().await {
            let state = update.state;
            states.push(state);
            if state.is_terminal() {
                break;
            }
        }
        states
    }

    #[tokio::test]
    async fn test_successful_job_reports_full_history() {
        let manager = TaskManager::new();
        let id = manager.enqueue(request(InstantJob::ok("/tmp/x.png"))).await;
        let mut rx = manager.observe(&id).await.expect("no observer channel");

        let states = collect_states(&mut rx).await;
        assert_eq!(
            states,
            vec![State::Enqueued, State::Running, State::Succeeded]
        );

        let details = manager.get_task_details(&id).await.unwrap();
        assert_eq!(details.state, State::Succeeded);
        assert!(details.finish_time.is_some());
        assert_eq!(
            details.result.get_text(keys::DOWNLOAD_PATH),
            Some("/tmp/x.png")
        );
    }

    #[tokio::test]
    async fn test_failing_job_reports_failed() {
        let manager = TaskManager::new();
        let id = manager.enqueue(request(InstantJob::failing())).await;
        let mut rx = manager.observe(&id).await.unwrap();

        let states = collect_states(&mut rx).await;
        assert_eq!(states.last(), Some(&State::Failed));
    }

    #[tokio::test]
    async fn test_single_observer_per_handle() {
        let manager = TaskManager::new();
        let id = manager.enqueue(request(InstantJob::ok("/tmp/x.png"))).await;

        assert!(manager.observe(&id).await.is_some());
        assert!(manager.observe(&id).await.is_none());
        assert!(manager.observe(&Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let manager = TaskManager::new();
        let id = manager.enqueue(request(Box::new(PendingJob))).await;
        let mut rx = manager.observe(&id).await.unwrap();

        manager.cancel(&id).await;
        manager.cancel(&id).await;
        manager.cancel(&Uuid::new_v4()).await;

        let states = collect_states(&mut rx).await;
        assert_eq!(states.last(), Some(&State::Cancelled));
        assert_eq!(
            manager.get_task_details(&id).await.unwrap().state,
            State::Cancelled
        );
    }

    #[tokio::test]
    async fn test_cancel_after_terminal_keeps_state() {
        let manager = TaskManager::new();
        let id = manager.enqueue(request(InstantJob::ok("/tmp/x.png"))).await;
        let mut rx = manager.observe(&id).await.unwrap();
        collect_states(&mut rx).await;

        manager.cancel(&id).await;
        assert_eq!(
            manager.get_task_details(&id).await.unwrap().state,
            State::Succeeded
        );
    }

    #[tokio::test]
    async fn test_cleanup_drops_expired_tasks() {
        let manager = TaskManager::new();
        let id = manager.enqueue(request(InstantJob::ok("/tmp/x.png"))).await;
        let mut rx = manager.observe(&id).await.unwrap();
        collect_states(&mut rx).await;

        // Not expired yet.
        manager.run_cleanup(chrono::Duration::hours(1)).await;
        assert!(manager.get_task_details(&id).await.is_some());

        manager.run_cleanup(chrono::Duration::zero()).await;
        assert!(manager.get_task_details(&id).await.is_none());
        assert!(manager.get_task_list().await.is_empty());
    }
}
