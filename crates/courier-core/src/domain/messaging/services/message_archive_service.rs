// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use async_trait::async_trait;

use courier_wasm_utils::{SendUnlessWasm, SyncUnlessWasm};

use crate::domain::messaging::models::{Message, MessageId, MessageStatus};
use crate::domain::shared::models::ConversationId;

/// Remote message history. Results are eventually consistent snapshots, so callers re-fetch
/// instead of assuming that their own mutations are already reflected.
///
/// Implementations fail with `ArchiveError::NoChatExists` if the two users have no relationship.
#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
#[cfg_attr(feature = "test", mockall::automock)]
pub trait MessageArchiveService: SendUnlessWasm + SyncUnlessWasm {
    async fn load_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>>;

    /// Sets the delete-for-me flag of `conversation_id.local` on the given messages.
    async fn delete_messages_for_me(
        &self,
        conversation_id: &ConversationId,
        message_ids: &[MessageId],
    ) -> Result<()>;

    async fn update_message_status(
        &self,
        conversation_id: &ConversationId,
        message_ids: &[MessageId],
        status: MessageStatus,
    ) -> Result<()>;

    async fn set_message_starred(
        &self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
        is_starred: bool,
    ) -> Result<()>;

    async fn load_starred_messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>>;
}
