// courier/courier-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use courier_core::dtos::{ConnectionError, UserId};
use courier_core::infra::transport::{
    Connection as ConnectionTrait, ConnectionEvent, ConnectionEventHandler,
    Connector as ConnectorTrait, InboundEvent, OutboundEvent,
};

/// A transport that records outbound events and lets tests inject inbound ones.
#[derive(Clone, Default)]
pub struct Connector {
    current_connection: Arc<Mutex<Option<Connection>>>,
    sent_events: Arc<Mutex<Vec<OutboundEvent>>>,
}

impl Connector {
    pub fn sent_events(&self) -> Vec<OutboundEvent> {
        self.sent_events.lock().drain(..).collect()
    }

    /// Delivers `json` as if it was received from the server.
    pub async fn receive(&self, json: serde_json::Value) {
        let event = serde_json::from_value::<InboundEvent>(json)
            .expect("Failed to parse inbound event");
        self.emit(ConnectionEvent::Event(event)).await
    }

    /// Simulates a dropped channel.
    pub async fn drop_connection(&self) {
        self.connection().is_connected.store(false, Ordering::SeqCst);
        self.emit(ConnectionEvent::Disconnected {
            error: Some(ConnectionError::TimedOut),
        })
        .await
    }

    pub async fn restore_connection(&self) {
        self.connection().is_connected.store(true, Ordering::SeqCst);
        self.emit(ConnectionEvent::Reconnected).await
    }

    async fn emit(&self, event: ConnectionEvent) {
        let connection = self.connection();
        (connection.event_handler)(event).await
    }

    fn connection(&self) -> Connection {
        self.current_connection
            .lock()
            .clone()
            .expect("Client is not connected")
    }
}

#[async_trait]
impl ConnectorTrait for Connector {
    async fn connect(
        &self,
        _user_id: &UserId,
        event_handler: ConnectionEventHandler,
    ) -> Result<Box<dyn ConnectionTrait>, ConnectionError> {
        let connection = Connection {
            event_handler: Arc::new(event_handler),
            is_connected: Arc::new(AtomicBool::new(true)),
            sent_events: self.sent_events.clone(),
        };
        self.current_connection.lock().replace(connection.clone());
        Ok(Box::new(connection))
    }
}

#[derive(Clone)]
struct Connection {
    event_handler: Arc<ConnectionEventHandler>,
    is_connected: Arc<AtomicBool>,
    sent_events: Arc<Mutex<Vec<OutboundEvent>>>,
}

impl ConnectionTrait for Connection {
    fn send_event(&self, event: OutboundEvent) -> Result<()> {
        if !self.is_connected() {
            return Err(ConnectionError::NotConnected.into());
        }
        self.sent_events.lock().push(event);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst)
    }

    fn reconnect_now(&self) {}

    fn disconnect(&self) {
        self.is_connected.store(false, Ordering::SeqCst);
    }
}
