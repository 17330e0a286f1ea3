// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::ops::Deref;
use std::sync::Arc;

use anyhow::Result;

use courier_wasm_utils::{SendUnlessWasm, SyncUnlessWasm};

use crate::app::deps::{AppDependencies, DynAppContext};
use crate::app::services::{ConnectionService, Conversation, ConversationsService};
use crate::client_builder::{ClientBuilder, UndefinedConnector, UndefinedRemoteServices};
use crate::domain::connection::models::ConnectionError;
use crate::domain::shared::models::{ConnectionState, ConversationId, UserId};
use crate::ClientEvent;

#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub trait ClientDelegate: SendUnlessWasm + SyncUnlessWasm {
    fn handle_event(&self, client: Client, event: ClientEvent);
}

impl Client {
    pub fn builder() -> ClientBuilder<UndefinedConnector, UndefinedRemoteServices> {
        ClientBuilder::new()
    }
}

pub struct ClientInner {
    pub conversations: ConversationsService,
    pub(crate) connection: ConnectionService,
    pub(crate) ctx: DynAppContext,
    pub(crate) deps: AppDependencies,
}

impl From<Arc<ClientInner>> for Client {
    fn from(inner: Arc<ClientInner>) -> Self {
        Client { inner }
    }
}

impl Deref for Client {
    type Target = ClientInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Client {
    pub async fn connect(&self, user_id: &UserId) -> Result<(), ConnectionError> {
        self.connection.connect(user_id).await
    }

    pub async fn disconnect(&self) {
        self.connection.disconnect().await
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.connection_state()
    }

    pub fn connected_user_id(&self) -> Option<UserId> {
        self.ctx.connected_user_id.read().clone()
    }
}

impl Client {
    pub async fn open_conversation(&self, other_user_id: &UserId) -> Result<Conversation> {
        self.conversations.open_conversation(other_user_id).await
    }

    pub async fn close_conversation(&self, conversation_id: &ConversationId) {
        self.conversations.close_conversation(conversation_id).await
    }

    /// The conversation that is currently open, if any.
    pub fn open_conversation_handle(&self) -> Option<Conversation> {
        self.ctx
            .open_conversation()
            .map(|data| Conversation::new(data, &self.deps))
    }
}
