use std::sync::Arc;

use tokio::sync::mpsc;

use wallsmith_core::notification_types::Message;

use crate::notification::Notifier;
use crate::settings::Settings;
use crate::tasks::TaskManager;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub task_manager: TaskManager,
    pub notifier: Arc<Notifier>,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    /// Wires the engine up from the loaded settings. `ui_sender` attaches a
    /// receiver for channel notifications; pass `None` in headless setups.
    pub fn new(ui_sender: Option<mpsc::Sender<Message>>) -> anyhow::Result<SharedAppState> {
        let settings = Settings::new()?;
        let notifier = Arc::new(Notifier::new(
            settings.notifications.receivers.clone(),
            ui_sender,
        ));

        Ok(Arc::new(AppState {
            settings,
            task_manager: TaskManager::new(),
            notifier,
        }))
    }

    pub fn new_for_config_only() -> anyhow::Result<SharedAppState> {
        let settings = Settings::new()?;
        let notifier = Arc::new(Notifier::new(vec![], None));

        Ok(Arc::new(AppState {
            settings,
            task_manager: TaskManager::new(),
            notifier,
        }))
    }
}
