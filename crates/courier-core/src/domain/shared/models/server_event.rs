// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::connection::models::ConnectionError;
use crate::domain::messaging::models::{Message, MessageId, StatusUpdate};

use super::UserId;

/// A validated inbound event, independent of the wire format it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Connection(ConnectionEvent),
    Message(MessageEvent),
    UserStatus(UserStatusEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    Connected,
    Disconnected { error: Option<ConnectionError> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    pub r#type: MessageEventType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageEventType {
    Received(Message),
    StatusUpdated {
        id: MessageId,
        update: StatusUpdate,
    },
    Edited {
        id: MessageId,
        content: String,
    },
    DeletedForEveryone {
        ids: Vec<MessageId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserStatusEvent {
    pub user_id: UserId,
    pub r#type: UserStatusEventType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserStatusEventType {
    TypingChanged { is_typing: bool },
    ActivityChanged { is_active: bool },
}
