// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::{Arc, OnceLock};

use anyhow::Result;
use parking_lot::RwLock;
use tracing::{error, warn};

use courier_wasm_utils::{CourierFutureExt, PinnedFuture};

use crate::domain::connection::models::ConnectionError;
use crate::domain::shared::models::{
    ConnectionEvent as ServerConnectionEvent, ServerEvent, UserId,
};

use super::{Connection, ConnectionEvent, ConnectionEventHandler, Connector, OutboundEvent};

#[cfg(target_arch = "wasm32")]
pub type ServerEventCallback = Arc<dyn Fn(ServerEvent) -> PinnedFuture<()>>;
#[cfg(not(target_arch = "wasm32"))]
pub type ServerEventCallback = Arc<dyn Fn(ServerEvent) -> PinnedFuture<()> + Send + Sync>;

/// The connection handle shared by the services that talk to the server. It owns at most one
/// connection at a time and turns validated inbound events into `ServerEvent`s.
pub struct SocketClient {
    connector: Box<dyn Connector>,
    connection: RwLock<Option<Arc<dyn Connection>>>,
    event_handler: OnceLock<ServerEventCallback>,
}

impl SocketClient {
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self {
            connector,
            connection: Default::default(),
            event_handler: Default::default(),
        }
    }

    pub fn set_event_handler(&self, handler: ServerEventCallback) {
        if self.event_handler.set(handler).is_err() {
            warn!("Ignoring attempt to replace the event handler of SocketClient.");
        }
    }

    pub fn send_event(&self, event: OutboundEvent) -> Result<()> {
        let Some(connection) = self.connection.read().clone() else {
            return Err(ConnectionError::NotConnected.into());
        };
        connection.send_event(event)
    }

    pub(crate) fn current_connection(&self) -> Option<Arc<dyn Connection>> {
        self.connection.read().clone()
    }

    pub(crate) fn replace_connection(
        &self,
        connection: Option<Box<dyn Connection>>,
    ) -> Option<Arc<dyn Connection>> {
        let connection = connection.map(Arc::from);
        std::mem::replace(&mut *self.connection.write(), connection)
    }

    pub(crate) async fn open_connection(
        &self,
        user_id: &UserId,
    ) -> Result<Box<dyn Connection>, ConnectionError> {
        self.connector
            .connect(user_id, self.connection_event_handler())
            .await
    }

    pub(crate) async fn dispatch(&self, event: ServerEvent) {
        if let Some(handler) = self.event_handler.get() {
            (handler)(event).await
        }
    }

    fn connection_event_handler(&self) -> ConnectionEventHandler {
        let handler = self.event_handler.get().cloned();

        Box::new(move |event| {
            let handler = handler.clone();

            async move {
                let Some(handler) = handler else {
                    return;
                };

                let event = match event {
                    ConnectionEvent::Reconnected => {
                        ServerEvent::Connection(ServerConnectionEvent::Connected)
                    }
                    ConnectionEvent::Disconnected { error } => {
                        ServerEvent::Connection(ServerConnectionEvent::Disconnected { error })
                    }
                    ConnectionEvent::Event(event) => {
                        let name = event.name();
                        match ServerEvent::try_from(event) {
                            Ok(event) => event,
                            Err(err) => {
                                error!("Dropping invalid '{name}' event. {}", err.to_string());
                                return;
                            }
                        }
                    }
                };

                (handler)(event).await
            }
            .pinned()
        })
    }
}
