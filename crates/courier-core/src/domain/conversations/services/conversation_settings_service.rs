// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use async_trait::async_trait;

use courier_wasm_utils::{SendUnlessWasm, SyncUnlessWasm};

use crate::domain::conversations::models::ConversationSettings;
use crate::domain::shared::models::ConversationId;

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
#[cfg_attr(feature = "test", mockall::automock)]
pub trait ConversationSettingsService: SendUnlessWasm + SyncUnlessWasm {
    async fn load_settings(&self, conversation_id: &ConversationId)
        -> Result<ConversationSettings>;

    async fn save_settings(
        &self,
        conversation_id: &ConversationId,
        settings: &ConversationSettings,
    ) -> Result<()>;
}
