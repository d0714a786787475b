use std::collections::HashMap;

use super::Channel;
use crate::message::Message;

#[derive(Debug, Default)]
pub struct ChannelManager {
    channels: HashMap<String, Channel>,
}

impl ChannelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a message under its channel, creating the channel on first sight.
    /// The sentinel message is never filed.
    pub fn add_message(&mut self, message: Message) -> bool {
        if message.is_empty() {
            return false;
        }
        self.channels
            .entry(message.channel().to_string())
            .or_insert_with_key(|address| Channel::new(address))
            .add_message(message);
        true
    }

    pub fn get_channel(&self, address: &str) -> Option<&Channel> {
        self.channels.get(address)
    }

    /// Channel addresses, most recently active first
    pub fn list_channels(&self) -> Vec<String> {
        let mut channels: Vec<&Channel> = self.channels.values().collect();
        channels.sort_by(|a, b| {
            b.last_activity
                .cmp(&a.last_activity)
                .then_with(|| a.address.cmp(&b.address))
        });
        channels.into_iter().map(|c| c.address.clone()).collect()
    }

    pub fn get_message_count(&self, address: &str) -> usize {
        self.channels
            .get(address)
            .map(|c| c.get_message_count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::MAX_MESSAGES_PER_CHANNEL;
    use crate::identity::KeyPair;
    use std::collections::HashSet;

    fn received(keys: &KeyPair, channel: &str, content: &str, at: i64) -> Message {
        let unit = Message::from_author("alice", content, channel, keys)
            .unwrap()
            .to_wire()
            .unwrap()
            .received_at(at);
        Message::from_wire(&unit, &HashSet::new(), "").unwrap()
    }

    #[test]
    fn out_of_order_messages_are_sorted() {
        let keys = KeyPair::generate();
        let mut manager = ChannelManager::new();
        manager.add_message(received(&keys, "LOBBY", "third", 30));
        manager.add_message(received(&keys, "LOBBY", "first", 10));
        manager.add_message(received(&keys, "LOBBY", "second", 20));

        let channel = manager.get_channel("LOBBY").unwrap();
        let contents: Vec<&str> = channel.messages.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(channel.last_activity, 30);
    }

    #[test]
    fn channels_listed_by_activity() {
        let keys = KeyPair::generate();
        let mut manager = ChannelManager::new();
        manager.add_message(received(&keys, "OLD", "a", 1));
        manager.add_message(received(&keys, "NEW", "b", 2));

        assert_eq!(manager.list_channels(), vec!["NEW", "OLD"]);
        assert_eq!(manager.get_message_count("OLD"), 1);
        assert_eq!(manager.get_message_count("MISSING"), 0);
    }

    #[test]
    fn sentinel_is_not_filed() {
        let mut manager = ChannelManager::new();
        assert!(!manager.add_message(Message::empty()));
        assert!(manager.list_channels().is_empty());
    }

    #[test]
    fn channel_is_capped() {
        let keys = KeyPair::generate();
        let template = received(&keys, "LOBBY", "spam", 0);
        let mut channel = Channel::new("LOBBY");
        for _ in 0..MAX_MESSAGES_PER_CHANNEL + 5 {
            channel.add_message(template.clone());
        }
        assert_eq!(channel.get_message_count(), MAX_MESSAGES_PER_CHANNEL);
    }
}
