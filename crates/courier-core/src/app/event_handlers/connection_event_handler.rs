// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use courier_proc_macros::InjectDependencies;

use crate::app::deps::{
    DynAppContext, DynClientEventDispatcher, DynMessageArchiveService, DynMessagingService,
};
use crate::app::event_handlers::ServerEventHandler;
use crate::domain::shared::models::{ConnectionEvent, ConnectionState, ServerEvent};
use crate::{ClientEvent, ConnectionEvent as ClientConnectionEvent, ConversationEventType};

#[derive(InjectDependencies)]
pub struct ConnectionEventHandler {
    #[inject]
    ctx: DynAppContext,
    #[inject]
    client_event_dispatcher: DynClientEventDispatcher,
    #[inject]
    message_archive_service: DynMessageArchiveService,
    #[inject]
    messaging_service: DynMessagingService,
}

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
impl ServerEventHandler for ConnectionEventHandler {
    fn name(&self) -> &'static str {
        "connection"
    }

    async fn handle_event(&self, event: ServerEvent) -> Result<Option<ServerEvent>> {
        match event {
            ServerEvent::Connection(event) => self.handle_connection_event(event).await?,
            _ => return Ok(Some(event)),
        }
        Ok(None)
    }
}

impl ConnectionEventHandler {
    async fn handle_connection_event(&self, event: ConnectionEvent) -> Result<()> {
        match event {
            ConnectionEvent::Connected => {
                *self.ctx.connection_state.write() = ConnectionState::Connected;
                self.client_event_dispatcher
                    .dispatch_event(ClientEvent::ConnectionStatusChanged {
                        event: ClientConnectionEvent::Connect,
                    });
                self.rejoin_open_conversation().await?;
            }
            ConnectionEvent::Disconnected { error } => {
                *self.ctx.connection_state.write() = ConnectionState::Disconnected;
                // Peers will announce their state again after we're back.
                self.ctx.peer_states.write().clear();
                self.client_event_dispatcher
                    .dispatch_event(ClientEvent::ConnectionStatusChanged {
                        event: ClientConnectionEvent::Disconnect { error },
                    });
            }
        }
        Ok(())
    }

    /// The server forgets about room memberships when the connection drops and events that were
    /// broadcast in the meantime are lost, so we re-join and reload the history.
    async fn rejoin_open_conversation(&self) -> Result<()> {
        let Some(conversation) = self.ctx.open_conversation() else {
            return Ok(());
        };

        info!("Rejoining conversation {} after reconnect…", conversation.id);

        self.messaging_service
            .join_conversation(&conversation.id)
            .await?;

        let messages = self
            .message_archive_service
            .load_messages(&conversation.id)
            .await?;

        if !conversation.is_open() {
            return Ok(());
        }

        conversation
            .state_mut()
            .messages
            .replace_with_snapshot(messages);

        self.client_event_dispatcher.dispatch_conversation_event(
            &conversation.id,
            ConversationEventType::MessagesNeedReload,
        );

        Ok(())
    }
}
