// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::time::Duration;

use crate::domain::connection::models::ConnectionError;
use crate::domain::messaging::models::{ComposeError, MessageId};
use crate::domain::shared::models::{ConversationId, UserId};

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The status of the connection has changed.
    ConnectionStatusChanged { event: ConnectionEvent },

    ConversationChanged {
        conversation_id: ConversationId,
        r#type: ConversationEventType,
    },

    /// A user became active or inactive. Drives the "typing…" badges of a conversation list.
    PeerActivityChanged { user_id: UserId, is_active: bool },

    /// A message was received for a conversation that is not open. Conversation lists should
    /// reload their previews from the server.
    BackgroundMessageReceived {
        conversation_id: ConversationId,
        message_id: MessageId,
    },

    /// The server reported that there is no chat between the two users. The conversation should
    /// be left after `leave_after`.
    ConversationUnavailable {
        conversation_id: ConversationId,
        leave_after: Duration,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversationEventType {
    /// One or many messages were either received or sent.
    MessagesAppended { message_ids: Vec<MessageId> },

    /// One or many messages changed their status, content, send state or flags.
    MessagesUpdated { message_ids: Vec<MessageId> },

    /// Messages were deleted for everyone.
    MessagesDeleted { message_ids: Vec<MessageId> },

    /// The history was reloaded, e.g. after a reconnect or a delete-for-me.
    MessagesNeedReload,

    UnreadCountChanged { count: u32 },

    /// The other participant started or stopped typing.
    ComposingUsersChanged,

    /// A message could not be handed to the server. It stays in the list as failed.
    SendFailed {
        message_id: MessageId,
        error: ComposeError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    Connect,
    Disconnect { error: Option<ConnectionError> },
}
