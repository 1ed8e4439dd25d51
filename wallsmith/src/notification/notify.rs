use tokio::sync::mpsc;
use tracing::debug;

use wallsmith_core::notification_types::{Message, NotificationImpl, NotificationReceiver};

use super::channel::NotifyChannel;
use super::log::NotifyLog;

/// Fans one message out to all configured receivers.
///
/// Showing a notification is cosmetic: every sink failure is logged and
/// swallowed here, nothing propagates back into the flows that triggered the
/// message.
pub struct Notifier {
    receivers: Vec<NotificationReceiver>,
    ui_sender: Option<mpsc::Sender<Message>>,
}

impl Notifier {
    pub fn new(
        receivers: Vec<NotificationReceiver>,
        ui_sender: Option<mpsc::Sender<Message>>,
    ) -> Self {
        Self {
            receivers,
            ui_sender,
        }
    }

    fn get_receiver_impl(
        &self,
        to: &NotificationReceiver,
    ) -> anyhow::Result<Box<dyn NotificationImpl>> {
        match to {
            NotificationReceiver::Log => Ok(Box::new(NotifyLog::new())),
            NotificationReceiver::Channel(context) => Ok(Box::new(NotifyChannel::new(
                self.ui_sender.clone().ok_or(anyhow::anyhow!(
                    "channel {} has no attached receiver",
                    context.channel_id
                ))?,
            ))),
        }
    }

    pub async fn notify(&self, msg: &Message) {
        let results: Vec<anyhow::Result<()>> =
            futures_util::future::join_all(self.receivers.iter().map(|to| async {
                match self.get_receiver_impl(to) {
                    Ok(helper) => helper.notify(msg).await,
                    Err(err) => Err(err),
                }
            }))
            .await;

        for result in results {
            if let Err(err) = result {
                debug!("Failed to display notification: {:?}", err);
            }
        }
    }
}
