use async_trait::async_trait;

use wallsmith_core::notification_types::{Message, NotificationImpl};

pub struct NotifyLog;

impl Default for NotifyLog {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyLog {
    pub fn new() -> Self {
        NotifyLog {}
    }
}

#[async_trait]
impl NotificationImpl for NotifyLog {
    async fn notify(&self, msg: &Message) -> anyhow::Result<()> {
        tracing::info!("{}", msg.text);
        Ok(())
    }
}
