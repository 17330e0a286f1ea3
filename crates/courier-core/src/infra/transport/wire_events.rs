// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use serde::{Deserialize, Serialize};

use crate::domain::messaging::models::{Message, MessageId, MessageStatus, StatusUpdate};
use crate::domain::shared::models::{
    ConversationId, MessageEvent, MessageEventType, ServerEvent, UserId, UserStatusEvent,
    UserStatusEventType,
};

/// An event as sent by the server. Every frame is a JSON object of the form
/// `{"event": "<name>", "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum InboundEvent {
    ReceiveMessage(Message),
    UserTyping(UserTypingPayload),
    UserActivityUpdate(UserActivityUpdatePayload),
    MessageStatusUpdatedToRead(Message),
    MessagesDeletedForEveryone(MessagesDeletedPayload),
    MessageEdited(MessageEditedPayload),
    MessageDelivered(MessageDeliveredPayload),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypingPayload {
    pub user_id: UserId,
    pub typing: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivityUpdatePayload {
    pub user_id: UserId,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesDeletedPayload {
    pub message_ids: Vec<MessageId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageEditedPayload {
    pub id: MessageId,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeliveredPayload {
    pub transformed_message: Message,
}

/// An event sent to the server, framed like `InboundEvent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum OutboundEvent {
    SendMessage(Message),
    Typing(TypingPayload),
    UserActivity(UserActivityPayload),
    EditMessage(EditMessagePayload),
    DeleteForEveryone(DeleteForEveryonePayload),
    LastValidMessageForMe(LastValidMessagePayload),
    OtherUserOnline(OtherUserOnlinePayload),
    UpdateMessageStatusRead(MessageStatusReadPayload),
    JoinRoom(ConversationId),
    LeaveRoom(ConversationId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypingPayload {
    #[serde(flatten)]
    pub conversation_id: ConversationId,
    pub typing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivityPayload {
    #[serde(flatten)]
    pub conversation_id: ConversationId,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMessagePayload {
    pub message_id: MessageId,
    pub new_content: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteForEveryonePayload {
    #[serde(flatten)]
    pub conversation_id: ConversationId,
    pub message_ids: Vec<MessageId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastValidMessagePayload {
    #[serde(flatten)]
    pub conversation_id: ConversationId,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtherUserOnlinePayload {
    #[serde(flatten)]
    pub conversation_id: ConversationId,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStatusReadPayload {
    #[serde(flatten)]
    pub conversation_id: ConversationId,
    pub message_id: MessageId,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EventValidationError {
    #[error("Field '{0}' must not be empty.")]
    EmptyField(&'static str),
    #[error("Message '{0}' has the same sender and receiver.")]
    SameSenderAndReceiver(MessageId),
    #[error("Status update for message '{id}' carries status {status}.")]
    UnexpectedStatus {
        id: MessageId,
        status: MessageStatus,
    },
}

impl InboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReceiveMessage(_) => "receiveMessage",
            Self::UserTyping(_) => "userTyping",
            Self::UserActivityUpdate(_) => "userActivityUpdate",
            Self::MessageStatusUpdatedToRead(_) => "messageStatusUpdatedToRead",
            Self::MessagesDeletedForEveryone(_) => "messagesDeletedForEveryone",
            Self::MessageEdited(_) => "messageEdited",
            Self::MessageDelivered(_) => "messageDelivered",
        }
    }

    /// Checks the constraints that the type system cannot express.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        match self {
            Self::ReceiveMessage(message) => validate_message(message),
            Self::UserTyping(payload) => non_empty("userId", payload.user_id.is_empty()),
            Self::UserActivityUpdate(payload) => non_empty("userId", payload.user_id.is_empty()),
            Self::MessageStatusUpdatedToRead(message) => {
                validate_message(message)?;
                if message.status != MessageStatus::Read {
                    return Err(EventValidationError::UnexpectedStatus {
                        id: message.id.clone(),
                        status: message.status,
                    });
                }
                Ok(())
            }
            Self::MessagesDeletedForEveryone(payload) => {
                non_empty("messageIds", payload.message_ids.is_empty())?;
                for id in payload.message_ids.iter() {
                    non_empty("messageIds", id.is_empty())?;
                }
                Ok(())
            }
            Self::MessageEdited(payload) => {
                non_empty("id", payload.id.is_empty())?;
                non_empty("content", payload.content.trim().is_empty())
            }
            Self::MessageDelivered(payload) => {
                let message = &payload.transformed_message;
                validate_message(message)?;
                if message.status == MessageStatus::Sent {
                    return Err(EventValidationError::UnexpectedStatus {
                        id: message.id.clone(),
                        status: message.status,
                    });
                }
                Ok(())
            }
        }
    }
}

fn non_empty(field: &'static str, is_empty: bool) -> Result<(), EventValidationError> {
    if is_empty {
        return Err(EventValidationError::EmptyField(field));
    }
    Ok(())
}

fn validate_message(message: &Message) -> Result<(), EventValidationError> {
    non_empty("id", message.id.is_empty())?;
    non_empty("sender", message.sender.is_empty())?;
    non_empty("receiver", message.receiver.is_empty())?;
    if message.sender == message.receiver {
        return Err(EventValidationError::SameSenderAndReceiver(
            message.id.clone(),
        ));
    }
    Ok(())
}

impl TryFrom<InboundEvent> for ServerEvent {
    type Error = EventValidationError;

    fn try_from(event: InboundEvent) -> Result<Self, Self::Error> {
        event.validate()?;

        let event = match event {
            InboundEvent::ReceiveMessage(message) => message_event(MessageEventType::Received(message)),
            InboundEvent::UserTyping(payload) => ServerEvent::UserStatus(UserStatusEvent {
                user_id: payload.user_id,
                r#type: UserStatusEventType::TypingChanged {
                    is_typing: payload.typing,
                },
            }),
            InboundEvent::UserActivityUpdate(payload) => ServerEvent::UserStatus(UserStatusEvent {
                user_id: payload.user_id,
                r#type: UserStatusEventType::ActivityChanged {
                    is_active: payload.is_active,
                },
            }),
            InboundEvent::MessageStatusUpdatedToRead(message)
            | InboundEvent::MessageDelivered(MessageDeliveredPayload {
                transformed_message: message,
            }) => message_event(MessageEventType::StatusUpdated {
                update: StatusUpdate {
                    status: message.status,
                    delivered_at: message.delivered_at,
                    read_at: message.read_at,
                },
                id: message.id,
            }),
            InboundEvent::MessagesDeletedForEveryone(payload) => {
                message_event(MessageEventType::DeletedForEveryone {
                    ids: payload.message_ids,
                })
            }
            InboundEvent::MessageEdited(payload) => message_event(MessageEventType::Edited {
                id: payload.id,
                content: payload.content,
            }),
        };

        Ok(event)
    }
}

fn message_event(r#type: MessageEventType) -> ServerEvent {
    ServerEvent::Message(MessageEvent { r#type })
}
