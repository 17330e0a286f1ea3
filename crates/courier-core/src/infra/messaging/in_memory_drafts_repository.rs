// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::conversations::models::Draft;
use crate::domain::messaging::repos::DraftsRepository;
use crate::domain::shared::models::ConversationId;

#[derive(Default)]
pub struct InMemoryDraftsRepository {
    drafts: RwLock<HashMap<ConversationId, Draft>>,
}

impl InMemoryDraftsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
impl DraftsRepository for InMemoryDraftsRepository {
    async fn get(&self, conversation_id: &ConversationId) -> Result<Option<Draft>> {
        Ok(self.drafts.read().get(conversation_id).cloned())
    }

    async fn set(&self, conversation_id: &ConversationId, draft: Option<&Draft>) -> Result<()> {
        let mut drafts = self.drafts.write();
        match draft.filter(|draft| !draft.is_empty()) {
            Some(draft) => drafts.insert(conversation_id.clone(), draft.clone()),
            None => drafts.remove(conversation_id),
        };
        Ok(())
    }
}
