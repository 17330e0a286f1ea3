// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use async_trait::async_trait;

use courier_wasm_utils::{SendUnlessWasm, SyncUnlessWasm};

use crate::domain::conversations::models::Draft;
use crate::domain::shared::models::ConversationId;

/// Durable storage for the unsent compose state of a conversation. Concurrent writers are not
/// coordinated, the last write wins.
#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
#[cfg_attr(feature = "test", mockall::automock)]
pub trait DraftsRepository: SendUnlessWasm + SyncUnlessWasm {
    async fn get(&self, conversation_id: &ConversationId) -> Result<Option<Draft>>;
    async fn set(&self, conversation_id: &ConversationId, draft: Option<&Draft>) -> Result<()>;
}
