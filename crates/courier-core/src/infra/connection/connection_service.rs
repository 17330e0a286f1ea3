// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use async_trait::async_trait;
use tracing::info;

use crate::domain::connection::models::ConnectionError;
use crate::domain::connection::services::ConnectionService;
use crate::domain::shared::models::{ConnectionEvent, ServerEvent, UserId};
use crate::infra::transport::SocketClient;

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
impl ConnectionService for SocketClient {
    async fn connect(&self, user_id: &UserId) -> Result<(), ConnectionError> {
        let connection = self.open_connection(user_id).await?;

        if let Some(previous) = self.replace_connection(Some(connection)) {
            info!("Replacing existing connection.");
            previous.disconnect();
        }

        self.dispatch(ServerEvent::Connection(ConnectionEvent::Connected))
            .await;
        Ok(())
    }

    async fn reconnect(&self) -> Result<(), ConnectionError> {
        let Some(connection) = self.current_connection() else {
            return Err(ConnectionError::NotConnected);
        };
        connection.reconnect_now();
        Ok(())
    }

    async fn disconnect(&self) {
        let Some(connection) = self.replace_connection(None) else {
            return;
        };
        connection.disconnect();

        self.dispatch(ServerEvent::Connection(ConnectionEvent::Disconnected {
            error: None,
        }))
        .await;
    }

    fn is_connected(&self) -> bool {
        self.current_connection()
            .map(|connection| connection.is_connected())
            .unwrap_or(false)
    }
}
