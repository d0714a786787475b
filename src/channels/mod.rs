//! Per-channel log of accepted messages.

use crate::message::Message;

pub use manager::ChannelManager;

mod manager;

/// Messages kept per channel before the oldest are dropped
pub const MAX_MESSAGES_PER_CHANNEL: usize = 250;

#[derive(Debug, Clone)]
pub struct Channel {
    pub address: String,
    pub messages: Vec<Message>,
    pub last_activity: i64,
}

impl Channel {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            messages: Vec::new(),
            last_activity: 0,
        }
    }

    pub fn add_message(&mut self, message: Message) {
        let timestamp = message.timestamp();

        // Fast path: in order, append
        if self
            .messages
            .last()
            .map_or(true, |last| last.timestamp() <= timestamp)
        {
            self.messages.push(message);
        } else {
            let insert_pos = self
                .messages
                .partition_point(|existing| existing.timestamp() <= timestamp);
            self.messages.insert(insert_pos, message);
        }
        self.last_activity = self.last_activity.max(timestamp);

        if self.messages.len() > MAX_MESSAGES_PER_CHANNEL {
            let remove_count = self.messages.len() - MAX_MESSAGES_PER_CHANNEL;
            self.messages.drain(0..remove_count);
        }
    }

    pub fn get_message_count(&self) -> usize {
        self.messages.len()
    }
}
