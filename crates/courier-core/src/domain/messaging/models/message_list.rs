// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::domain::shared::models::UserId;

use super::{Message, MessageId, MessageStatus, SendState, StatusUpdate};

/// The outcome of inserting a message received from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// The message was not known before and was appended to the end of the list.
    Appended,
    /// The message was the server's echo of a locally inserted message.
    Confirmed,
    /// The message was already known and confirmed but carried a newer status.
    Updated,
    /// The message was already known and confirmed. Nothing changed.
    Duplicate,
}

/// A message taken out of the list together with its position, see `MessageList::take`.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedMessage {
    index: usize,
    message: Message,
}

impl RemovedMessage {
    pub fn id(&self) -> &MessageId {
        &self.message.id
    }
}

/// The local, authoritative list of messages of an open conversation.
///
/// Messages are kept in the order in which they were inserted. Arrival order is display order,
/// timestamps are never used for sorting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageList {
    messages: IndexMap<MessageId, Message>,
}

impl MessageList {
    pub fn new(messages: impl IntoIterator<Item = Message>) -> Self {
        let mut list = Self::default();
        for message in messages {
            list.messages.entry(message.id.clone()).or_insert(message);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.get(id)
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.messages.contains_key(id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Message> {
        self.messages.values()
    }

    /// Iterates over all messages that `user_id` is allowed to see.
    pub fn visible_to<'a>(&'a self, user_id: &'a UserId) -> impl Iterator<Item = &'a Message> {
        self.messages
            .values()
            .filter(move |message| message.is_visible_to(user_id))
    }

    /// The most recent message that is visible to `user_id`, scanning backwards from the end.
    pub fn last_visible_message(&self, user_id: &UserId) -> Option<&Message> {
        self.messages
            .values()
            .rev()
            .find(|message| message.is_visible_to(user_id))
    }
}

impl MessageList {
    /// Inserts a locally composed message that has not been confirmed by the server yet.
    pub fn push_local(&mut self, mut message: Message) {
        debug_assert_ne!(message.send_state, SendState::Confirmed);
        self.snapshot_reply(&mut message);
        self.messages.insert(message.id.clone(), message);
    }

    /// Inserts a message received from the server.
    ///
    /// If the message replies to a message we know about, the current content of that message is
    /// copied into the reply reference. Messages are deduplicated by id so that a replay after a
    /// reconnect does not duplicate entries.
    pub fn insert_received(&mut self, mut message: Message) -> ReceiveOutcome {
        message.send_state = SendState::Confirmed;

        if let Some(existing) = self.messages.get_mut(&message.id) {
            let update = StatusUpdate {
                status: message.status,
                delivered_at: message.delivered_at,
                read_at: message.read_at,
            };

            if existing.send_state == SendState::Confirmed {
                if existing.apply_status_update(&update) {
                    return ReceiveOutcome::Updated;
                }
                debug!("Ignoring duplicate message '{}'.", message.id);
                return ReceiveOutcome::Duplicate;
            }

            existing.send_state = SendState::Confirmed;
            existing.apply_status_update(&update);
            return ReceiveOutcome::Confirmed;
        }

        self.snapshot_reply(&mut message);
        self.messages.insert(message.id.clone(), message);
        ReceiveOutcome::Appended
    }

    fn snapshot_reply(&self, message: &mut Message) {
        let Some(replied_to) = message.replied_to.as_mut() else {
            return;
        };
        if let Some(original) = self.messages.get(&replied_to.id) {
            replied_to.content = Some(original.content.clone());
        }
    }

    /// Merges `update` into the message with `id`. Unknown ids and regressions are ignored.
    ///
    /// Returns true if the message changed.
    pub fn apply_status_update(&mut self, id: &MessageId, update: &StatusUpdate) -> bool {
        let Some(message) = self.messages.get_mut(id) else {
            debug!("Ignoring status update for unknown message '{id}'.");
            return false;
        };
        message.apply_status_update(update)
    }

    /// Replaces the content of the message with `id`. No other field is touched.
    pub fn apply_edit(&mut self, id: &MessageId, content: impl Into<String>) -> bool {
        let Some(message) = self.messages.get_mut(id) else {
            debug!("Ignoring edit of unknown message '{id}'.");
            return false;
        };
        message.content = content.into();
        true
    }

    /// Permanently removes all messages with the given ids and returns the ids that were present.
    pub fn remove<'a>(&mut self, ids: impl IntoIterator<Item = &'a MessageId>) -> Vec<MessageId> {
        ids.into_iter()
            .filter_map(|id| self.messages.shift_remove(id).map(|message| message.id))
            .collect()
    }

    /// Removes the messages with the given ids like `remove` but hands them back so that the
    /// removal can be undone with `restore`.
    pub fn take<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a MessageId>,
    ) -> Vec<RemovedMessage> {
        ids.into_iter()
            .filter_map(|id| {
                self.messages
                    .shift_remove_full(id)
                    .map(|(index, _, message)| RemovedMessage { index, message })
            })
            .collect()
    }

    /// Puts messages returned by `take` back at their former positions. Messages that were
    /// received again in the meantime are left alone.
    pub fn restore(&mut self, removed: Vec<RemovedMessage>) {
        for RemovedMessage { index, message } in removed.into_iter().rev() {
            if self.messages.contains_key(&message.id) {
                continue;
            }
            let index = index.min(self.messages.len());
            self.messages.shift_insert(index, message.id.clone(), message);
        }
    }

    pub fn set_send_state(&mut self, id: &MessageId, state: SendState) -> bool {
        let Some(message) = self.messages.get_mut(id) else {
            return false;
        };
        message.send_state = state;
        true
    }

    pub fn set_starred_by_current_user(&mut self, id: &MessageId, is_starred: bool) -> bool {
        let Some(message) = self.messages.get_mut(id) else {
            return false;
        };
        if message.is_starred_by_current_user == is_starred {
            return false;
        }
        message.is_starred_by_current_user = is_starred;
        true
    }

    /// Marks every message `sender` sent that is still `SENT` as delivered at `now`.
    ///
    /// Returns the ids of the affected messages.
    pub fn mark_sent_messages_delivered(
        &mut self,
        sender: &UserId,
        now: DateTime<Utc>,
    ) -> Vec<MessageId> {
        let update = StatusUpdate::delivered(now);

        self.messages
            .values_mut()
            .filter(|message| {
                message.is_from(sender)
                    && message.status == MessageStatus::Sent
                    && message.send_state == SendState::Confirmed
            })
            .filter_map(|message| {
                message
                    .apply_status_update(&update)
                    .then(|| message.id.clone())
            })
            .collect()
    }

    /// The ids of all delivered but unread messages that `reader` received.
    pub fn unread_delivered_messages(&self, reader: &UserId) -> Vec<MessageId> {
        self.messages
            .values()
            .filter(|message| {
                !message.is_from(reader)
                    && message.status == MessageStatus::Delivered
                    && message.is_visible_to(reader)
            })
            .map(|message| message.id.clone())
            .collect()
    }

    /// Replaces the contents of the list with a fresh snapshot from the server. Local messages
    /// that are still pending or failed and unknown to the server are kept at the end.
    pub fn replace_with_snapshot(&mut self, snapshot: impl IntoIterator<Item = Message>) {
        let unconfirmed = self
            .messages
            .values()
            .filter(|message| message.send_state != SendState::Confirmed)
            .cloned()
            .collect::<Vec<_>>();

        let mut list = MessageList::new(snapshot);

        for message in unconfirmed {
            if !list.contains(&message.id) {
                list.messages.insert(message.id.clone(), message);
            }
        }

        *self = list;
    }
}
