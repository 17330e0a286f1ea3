// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::messaging::models::{Message, MessageId};
use crate::domain::messaging::services::MessagingService;
use crate::domain::shared::models::ConversationId;
use crate::infra::transport::{
    DeleteForEveryonePayload, EditMessagePayload, LastValidMessagePayload,
    MessageStatusReadPayload, OtherUserOnlinePayload, OutboundEvent, SocketClient, TypingPayload,
    UserActivityPayload,
};

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
impl MessagingService for SocketClient {
    async fn send_message(&self, message: &Message) -> Result<()> {
        self.send_event(OutboundEvent::SendMessage(message.clone()))
    }

    async fn edit_message(
        &self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
        new_content: &str,
    ) -> Result<()> {
        self.send_event(OutboundEvent::EditMessage(EditMessagePayload {
            message_id: message_id.clone(),
            new_content: new_content.to_string(),
            user_id: conversation_id.local.clone(),
        }))
    }

    async fn delete_messages_for_everyone(
        &self,
        conversation_id: &ConversationId,
        message_ids: &[MessageId],
    ) -> Result<()> {
        self.send_event(OutboundEvent::DeleteForEveryone(DeleteForEveryonePayload {
            conversation_id: conversation_id.clone(),
            message_ids: message_ids.to_vec(),
        }))
    }

    async fn announce_last_visible_message(
        &self,
        conversation_id: &ConversationId,
        message: Option<Message>,
    ) -> Result<()> {
        self.send_event(OutboundEvent::LastValidMessageForMe(
            LastValidMessagePayload {
                conversation_id: conversation_id.clone(),
                message,
            },
        ))
    }

    async fn set_user_is_typing(
        &self,
        conversation_id: &ConversationId,
        is_typing: bool,
    ) -> Result<()> {
        self.send_event(OutboundEvent::Typing(TypingPayload {
            conversation_id: conversation_id.clone(),
            typing: is_typing,
        }))
    }

    async fn set_user_is_active(
        &self,
        conversation_id: &ConversationId,
        is_active: bool,
    ) -> Result<()> {
        self.send_event(OutboundEvent::UserActivity(UserActivityPayload {
            conversation_id: conversation_id.clone(),
            is_active,
        }))
    }

    async fn announce_other_user_online(
        &self,
        conversation_id: &ConversationId,
        delivered_messages: &[Message],
    ) -> Result<()> {
        self.send_event(OutboundEvent::OtherUserOnline(OtherUserOnlinePayload {
            conversation_id: conversation_id.clone(),
            messages: delivered_messages.to_vec(),
        }))
    }

    async fn send_read_receipt(
        &self,
        conversation_id: &ConversationId,
        message: &Message,
    ) -> Result<()> {
        self.send_event(OutboundEvent::UpdateMessageStatusRead(
            MessageStatusReadPayload {
                conversation_id: conversation_id.clone(),
                message_id: message.id.clone(),
            },
        ))
    }

    async fn join_conversation(&self, conversation_id: &ConversationId) -> Result<()> {
        self.send_event(OutboundEvent::JoinRoom(conversation_id.clone()))
    }

    async fn leave_conversation(&self, conversation_id: &ConversationId) -> Result<()> {
        self.send_event(OutboundEvent::LeaveRoom(conversation_id.clone()))
    }
}
