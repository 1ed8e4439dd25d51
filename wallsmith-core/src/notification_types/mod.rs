use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::apply::ApplyMode;

/// How long an on-screen notification should stay visible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NotificationDuration {
    Short,
    Long,
    Indefinite,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChannelContext {
    pub channel_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NotificationReceiver {
    Log,
    Channel(ChannelContext),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum MessageType {
    ApplyEnqueued(ApplyMode),
    PreparingExternalApply,
    WallpaperApplied,
    ApplyFailed,
    Custom(String),
}

impl MessageType {
    fn get_message(&self) -> String {
        match &self {
            MessageType::ApplyEnqueued(mode) => {
                format!("Applying wallpaper ({mode})...")
            }
            MessageType::PreparingExternalApply => "Preparing wallpaper...".to_string(),
            MessageType::WallpaperApplied => "Wallpaper applied!".to_string(),
            MessageType::ApplyFailed => "Couldn't apply the wallpaper".to_string(),
            MessageType::Custom(msg) => msg.clone(),
        }
    }

    fn default_duration(&self) -> NotificationDuration {
        match &self {
            // Progress messages stay up until replaced by a terminal one.
            MessageType::ApplyEnqueued(_) | MessageType::PreparingExternalApply => {
                NotificationDuration::Indefinite
            }
            _ => NotificationDuration::Short,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_type: MessageType,
    pub text: String,
    pub duration: NotificationDuration,
    /// Optional anchor hint for the embedding UI (e.g. a view id to attach to).
    pub anchor: Option<String>,
}

impl Message {
    pub fn new(message_type: MessageType) -> Message {
        let text = message_type.get_message();
        let duration = message_type.default_duration();
        Message {
            message_type,
            text,
            duration,
            anchor: None,
        }
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Message {
        self.anchor = Some(anchor.into());
        self
    }
}

#[async_trait]
pub trait NotificationImpl: Send {
    async fn notify(&self, msg: &Message) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_text_and_duration() {
        let msg = Message::new(MessageType::ApplyEnqueued(ApplyMode::Lock));
        assert_eq!(msg.text, "Applying wallpaper (lock)...");
        assert_eq!(msg.duration, NotificationDuration::Indefinite);

        let msg = Message::new(MessageType::WallpaperApplied);
        assert_eq!(msg.duration, NotificationDuration::Short);
    }

    #[test]
    fn test_receiver_serde() {
        let value = NotificationReceiver::Channel(ChannelContext {
            channel_id: "main".to_string(),
        });
        let json = serde_json::to_string(&value).expect("Failed to serialize");
        assert_eq!(json, r#"{"Channel":{"channel_id":"main"}}"#);
    }
}
