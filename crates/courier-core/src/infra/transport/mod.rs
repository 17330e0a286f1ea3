// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use connector::{Connection, ConnectionEvent, ConnectionEventHandler, Connector};
pub use socket_client::{ServerEventCallback, SocketClient};
#[cfg(not(target_arch = "wasm32"))]
pub use websocket_connector::WebSocketConnector;
pub use wire_events::*;

mod connector;
mod socket_client;
#[cfg(not(target_arch = "wasm32"))]
mod websocket_connector;
mod wire_events;
