// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use tracing::{info, warn};

use courier_proc_macros::InjectDependencies;

use crate::app::deps::{DynAppContext, DynConnectionService, DynMessagingService};
use crate::domain::connection::models::ConnectionError;
use crate::domain::shared::models::{ConnectionState, UserId};

#[derive(InjectDependencies)]
pub struct ConnectionService {
    #[inject]
    ctx: DynAppContext,
    #[inject]
    connection_service: DynConnectionService,
    #[inject]
    messaging_service: DynMessagingService,
}

impl ConnectionService {
    #[tracing::instrument(skip(self))]
    pub async fn connect(&self, user_id: &UserId) -> Result<(), ConnectionError> {
        if user_id.is_empty() {
            return Err(ConnectionError::Generic {
                msg: "User id must not be empty.".to_string(),
            });
        }

        self.ctx.connected_user_id.write().replace(user_id.clone());
        *self.ctx.connection_state.write() = ConnectionState::Connecting;

        if let Err(err) = self.connection_service.connect(user_id).await {
            self.ctx.connected_user_id.write().take();
            *self.ctx.connection_state.write() = ConnectionState::Disconnected;
            return Err(err);
        }

        *self.ctx.connection_state.write() = ConnectionState::Connected;
        info!("Connected as {user_id}.");
        Ok(())
    }

    pub async fn disconnect(&self) {
        if let Some(conversation) = self.ctx.open_conversation() {
            if let Err(err) = self
                .messaging_service
                .leave_conversation(&conversation.id)
                .await
            {
                warn!("Failed to leave conversation. {}", err.to_string());
            }
            self.ctx.close_conversation(&conversation.id);
        }

        self.connection_service.disconnect().await;
        *self.ctx.connection_state.write() = ConnectionState::Disconnected;
        self.ctx.connected_user_id.write().take();
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.ctx.connection_state.read()
    }
}
