// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::domain::connection::models::ReconnectPolicy;
use crate::domain::conversations::models::ConversationInternals;
use crate::domain::shared::models::{ConnectionState, ConversationId, UserId};
use crate::domain::user_info::models::PeerStates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// How long after sending a message its author may still edit it or delete it for everyone.
    #[serde(with = "courier_utils::duration_ms")]
    pub edit_window: Duration,
    #[serde(with = "courier_utils::duration_ms")]
    pub typing_idle_timeout: Duration,
    #[serde(with = "courier_utils::duration_ms")]
    pub activity_idle_timeout: Duration,
    #[serde(with = "courier_utils::duration_ms")]
    pub presence_poll_interval: Duration,
    /// Debounce before delivered messages are marked as read.
    #[serde(with = "courier_utils::duration_ms")]
    pub read_receipt_delay: Duration,
    /// How long to wait for a reconnect before a send is considered failed.
    #[serde(with = "courier_utils::duration_ms")]
    pub connectivity_grace_period: Duration,
    #[serde(with = "courier_utils::duration_ms")]
    pub unavailable_conversation_leave_delay: Duration,
    pub reconnect: ReconnectPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            edit_window: Duration::from_secs(15 * 60),
            typing_idle_timeout: Duration::from_secs(1),
            activity_idle_timeout: Duration::from_secs(2),
            presence_poll_interval: Duration::from_secs(2),
            read_receipt_delay: Duration::from_secs(1),
            connectivity_grace_period: Duration::from_secs(3),
            unavailable_conversation_leave_delay: Duration::from_secs(3),
            reconnect: Default::default(),
        }
    }
}

pub struct AppContext {
    pub config: AppConfig,
    pub connection_state: RwLock<ConnectionState>,
    pub connected_user_id: RwLock<Option<UserId>>,
    pub open_conversation: RwLock<Option<Arc<ConversationInternals>>>,
    pub peer_states: RwLock<PeerStates>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            connection_state: Default::default(),
            connected_user_id: Default::default(),
            open_conversation: Default::default(),
            peer_states: Default::default(),
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

impl AppContext {
    pub fn connected_user_id(&self) -> Result<UserId> {
        self.connected_user_id.read().clone().ok_or(anyhow::anyhow!(
            "Failed to read the user's id since the client is not connected."
        ))
    }

    pub fn is_connected(&self) -> bool {
        *self.connection_state.read() == ConnectionState::Connected
    }

    pub fn open_conversation(&self) -> Option<Arc<ConversationInternals>> {
        self.open_conversation.read().clone()
    }

    /// The open conversation if it is the one identified by `id`.
    pub fn conversation(&self, id: &ConversationId) -> Option<Arc<ConversationInternals>> {
        self.open_conversation
            .read()
            .as_ref()
            .filter(|conversation| &conversation.id == id)
            .cloned()
    }
}

impl AppContext {
    pub fn set_open_conversation(&self, conversation: Arc<ConversationInternals>) {
        if let Some(previous) = self.open_conversation.write().replace(conversation) {
            previous.set_closed();
        }
    }

    pub fn close_conversation(&self, id: &ConversationId) -> Option<Arc<ConversationInternals>> {
        let mut open_conversation = self.open_conversation.write();
        if open_conversation.as_ref().map(|c| &c.id) != Some(id) {
            return None;
        }
        let conversation = open_conversation.take();
        if let Some(conversation) = &conversation {
            conversation.set_closed();
        }
        conversation
    }
}
