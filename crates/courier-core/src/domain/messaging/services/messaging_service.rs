// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use async_trait::async_trait;

use courier_wasm_utils::{SendUnlessWasm, SyncUnlessWasm};

use crate::domain::messaging::models::{Message, MessageId};
use crate::domain::shared::models::ConversationId;

/// The outbound half of the transport channel. Every method emits exactly one event.
#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
#[cfg_attr(feature = "test", mockall::automock)]
pub trait MessagingService: SendUnlessWasm + SyncUnlessWasm {
    async fn send_message(&self, message: &Message) -> Result<()>;

    async fn edit_message(
        &self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
        new_content: &str,
    ) -> Result<()>;

    async fn delete_messages_for_everyone(
        &self,
        conversation_id: &ConversationId,
        message_ids: &[MessageId],
    ) -> Result<()>;

    /// Publishes the last message `conversation_id.local` can still see so that conversation
    /// lists can update their preview.
    async fn announce_last_visible_message(
        &self,
        conversation_id: &ConversationId,
        message: Option<Message>,
    ) -> Result<()>;

    async fn set_user_is_typing(
        &self,
        conversation_id: &ConversationId,
        is_typing: bool,
    ) -> Result<()>;

    async fn set_user_is_active(
        &self,
        conversation_id: &ConversationId,
        is_active: bool,
    ) -> Result<()>;

    /// Tells the server that `conversation_id.other` was seen online and which of the local
    /// user's messages are now delivered.
    async fn announce_other_user_online(
        &self,
        conversation_id: &ConversationId,
        delivered_messages: &[Message],
    ) -> Result<()>;

    async fn send_read_receipt(&self, conversation_id: &ConversationId, message: &Message)
        -> Result<()>;

    async fn join_conversation(&self, conversation_id: &ConversationId) -> Result<()>;
    async fn leave_conversation(&self, conversation_id: &ConversationId) -> Result<()>;
}
