// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use async_trait::async_trait;

use courier_wasm_utils::{PinnedFuture, SendUnlessWasm, SyncUnlessWasm};

use crate::domain::connection::models::ConnectionError;
use crate::domain::shared::models::UserId;

use super::{InboundEvent, OutboundEvent};

#[cfg(target_arch = "wasm32")]
pub type ConnectionEventHandler = Box<dyn Fn(ConnectionEvent) -> PinnedFuture<()>>;
#[cfg(not(target_arch = "wasm32"))]
pub type ConnectionEventHandler =
    Box<dyn Fn(ConnectionEvent) -> PinnedFuture<()> + Send + Sync>;

/// Opens the transport channel. Implementations are expected to keep reconnecting on their own
/// after the channel was established once, until `Connection::disconnect` is called.
#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Connector: SendUnlessWasm + SyncUnlessWasm {
    async fn connect(
        &self,
        user_id: &UserId,
        event_handler: ConnectionEventHandler,
    ) -> Result<Box<dyn Connection>, ConnectionError>;
}

#[derive(Debug)]
pub enum ConnectionEvent {
    /// The channel is back after it was lost.
    Reconnected,
    Disconnected { error: Option<ConnectionError> },
    Event(InboundEvent),
}

pub trait Connection: SendUnlessWasm + SyncUnlessWasm {
    /// Fails with `ConnectionError::NotConnected` while the channel is down. Events are not
    /// buffered.
    fn send_event(&self, event: OutboundEvent) -> Result<()>;
    fn is_connected(&self) -> bool;
    /// Skips the current backoff delay if the channel is down.
    fn reconnect_now(&self);
    fn disconnect(&self);
}
