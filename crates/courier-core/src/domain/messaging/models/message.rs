// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::shared::models::{ConversationId, UserId};

use super::{MessageContent, MessageId, MessageStatus, SendState, StatusUpdate};

/// A weak reference to the message that another message replies to.
///
/// `content` is a snapshot of the original's content taken when the reply was received, so that
/// the preview survives later edits or deletions of the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepliedTo {
    pub id: MessageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl RepliedTo {
    pub fn id(id: impl Into<MessageId>) -> Self {
        Self {
            id: id.into(),
            content: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender: UserId,
    pub receiver: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(rename = "senderDFM", default)]
    pub sender_dfm: bool,
    #[serde(rename = "receiverDFM", default)]
    pub receiver_dfm: bool,
    #[serde(default)]
    pub del_for_all: bool,
    #[serde(default)]
    pub replied_to: Option<RepliedTo>,
    #[serde(default)]
    pub was_forwarded: bool,
    #[serde(default)]
    pub is_starred_by_current_user: bool,
    #[serde(default)]
    pub is_starred_by_other_user: bool,
    #[serde(skip)]
    pub send_state: SendState,
}

impl Message {
    /// Builds an optimistic message from the local user in `conversation`.
    pub fn outgoing(
        id: MessageId,
        conversation: &ConversationId,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
        replied_to: Option<RepliedTo>,
    ) -> Self {
        Self {
            id,
            sender: conversation.local.clone(),
            receiver: conversation.other.clone(),
            content: content.into(),
            timestamp,
            status: MessageStatus::Sent,
            delivered_at: None,
            read_at: None,
            sender_dfm: false,
            receiver_dfm: false,
            del_for_all: false,
            replied_to,
            was_forwarded: false,
            is_starred_by_current_user: false,
            is_starred_by_other_user: false,
            send_state: SendState::Pending,
        }
    }

    /// Builds a fresh copy of this message addressed to `conversation`. The copy gets a new id
    /// and timestamp, is marked as forwarded and drops the reply reference.
    pub fn forwarded_copy(
        &self,
        id: MessageId,
        conversation: &ConversationId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut message = Self::outgoing(id, conversation, self.content.clone(), timestamp, None);
        message.was_forwarded = true;
        message
    }
}

impl Message {
    pub fn is_from(&self, user_id: &UserId) -> bool {
        &self.sender == user_id
    }

    pub fn content(&self) -> MessageContent<'_> {
        MessageContent::parse(&self.content)
    }

    /// Returns true if `user_id` must not see this message, either because it was deleted for
    /// everyone or because `user_id` deleted it for themselves.
    pub fn is_hidden_for(&self, user_id: &UserId) -> bool {
        if self.del_for_all {
            return true;
        }
        (&self.sender == user_id && self.sender_dfm)
            || (&self.receiver == user_id && self.receiver_dfm)
    }

    pub fn is_visible_to(&self, user_id: &UserId) -> bool {
        !self.is_hidden_for(user_id)
    }

    /// Returns true if `now` is at most `window` after the message was created. Timestamps in
    /// the future (clock skew) count as inside the window.
    pub fn is_within_window(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match (now - self.timestamp).to_std() {
            Ok(age) => age <= window,
            Err(_) => true,
        }
    }

    /// Returns true if `user_id` may edit this message or delete it for everyone at `now`.
    pub fn can_be_modified_by(&self, user_id: &UserId, now: DateTime<Utc>, window: Duration) -> bool {
        self.is_from(user_id) && !self.del_for_all && self.is_within_window(now, window)
    }

    /// Applies the mutable fields of `update` unless it would move the status backwards.
    /// `delivered_at` and `read_at` are only ever set once.
    ///
    /// Returns true if the message changed.
    pub fn apply_status_update(&mut self, update: &StatusUpdate) -> bool {
        if !self.status.can_advance_to(update.status) {
            return false;
        }

        self.status = update.status;

        if update.status >= MessageStatus::Delivered && self.delivered_at.is_none() {
            self.delivered_at = update.delivered_at.or(update.read_at);
        }
        if update.status == MessageStatus::Read && self.read_at.is_none() {
            self.read_at = update.read_at;
        }

        true
    }
}
