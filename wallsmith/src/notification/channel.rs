use async_trait::async_trait;
use tokio::sync::mpsc;

use wallsmith_core::notification_types::{Message, NotificationImpl};

/// Forwards messages to an embedding UI over a channel. A dropped receiver
/// means there is no screen to show anything on; the send just fails and the
/// dispatcher swallows it.
pub struct NotifyChannel {
    sender: mpsc::Sender<Message>,
}

impl NotifyChannel {
    pub fn new(sender: mpsc::Sender<Message>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl NotificationImpl for NotifyChannel {
    async fn notify(&self, msg: &Message) -> anyhow::Result<()> {
        self.sender
            .send(msg.clone())
            .await
            .map_err(|_| anyhow::anyhow!("notification channel closed"))
    }
}
