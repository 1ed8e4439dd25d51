use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::apply::ApplyMode;

/// Lifecycle state of a background task.
///
/// Transitions are monotonic: `Enqueued` → `Running` → one of the terminal
/// states. There is no transition out of a terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum State {
    Enqueued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl State {
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Succeeded | State::Failed | State::Cancelled)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Enqueued => write!(f, "enqueued"),
            State::Running => write!(f, "running"),
            State::Succeeded => write!(f, "succeeded"),
            State::Failed => write!(f, "failed"),
            State::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A single value in a [`TaskResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ResultValue {
    Text(String),
    Int(i64),
}

/// Well-known result keys produced by the apply job.
pub mod keys {
    /// File path of the downloaded wallpaper.
    pub const DOWNLOAD_PATH: &str = "download_path";
    /// Integer encoding of the requested [`ApplyMode`](crate::apply::ApplyMode).
    pub const APPLY_OPTION: &str = "apply_option";
}

/// String-keyed output of a succeeded task. Immutable once produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskResult(HashMap<String, ResultValue>);

impl TaskResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), ResultValue::Text(value.into()));
        self
    }

    pub fn with_int(mut self, key: &str, value: i64) -> Self {
        self.0.insert(key.to_string(), ResultValue::Int(value));
        self
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ResultValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(ResultValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One observation delivered for a task handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateUpdate {
    pub state: State,
    /// Only populated when `state` is `Succeeded`.
    pub result: Option<TaskResult>,
}

impl StateUpdate {
    pub fn new(state: State) -> Self {
        Self {
            state,
            result: None,
        }
    }

    pub fn succeeded(result: TaskResult) -> Self {
        Self {
            state: State::Succeeded,
            result: Some(result),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDetails {
    pub id: Uuid,
    pub description: String,
    pub mode: ApplyMode,
    pub state: State,
    pub start_time: DateTime<Utc>,
    pub finish_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result: TaskResult,
}

impl TaskDetails {
    pub fn new(description: String, mode: ApplyMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            mode,
            state: State::Enqueued,
            start_time: chrono::Utc::now(),
            finish_time: None,
            result: TaskResult::default(),
        }
    }
}
