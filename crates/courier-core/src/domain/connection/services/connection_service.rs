// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use async_trait::async_trait;

use courier_wasm_utils::{SendUnlessWasm, SyncUnlessWasm};

use crate::domain::connection::models::ConnectionError;
use crate::domain::shared::models::UserId;

/// The owner of the transport channel. Once connected, the channel reconnects on its own until
/// `disconnect` is called.
#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
#[cfg_attr(feature = "test", mockall::automock)]
pub trait ConnectionService: SendUnlessWasm + SyncUnlessWasm {
    async fn connect(&self, user_id: &UserId) -> Result<(), ConnectionError>;
    /// Asks the channel to reconnect right away instead of waiting for its backoff timer.
    async fn reconnect(&self) -> Result<(), ConnectionError>;
    async fn disconnect(&self);
    fn is_connected(&self) -> bool;
}
