// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use courier_proc_macros::InjectDependencies;

use crate::app::deps::{DynAppContext, DynClientEventDispatcher};
use crate::app::event_handlers::ServerEventHandler;
use crate::domain::shared::models::{ServerEvent, UserStatusEvent, UserStatusEventType};
use crate::{ClientEvent, ConversationEventType};

#[derive(InjectDependencies)]
pub struct UserStateEventHandler {
    #[inject]
    ctx: DynAppContext,
    #[inject]
    client_event_dispatcher: DynClientEventDispatcher,
}

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
impl ServerEventHandler for UserStateEventHandler {
    fn name(&self) -> &'static str {
        "user_state"
    }

    async fn handle_event(&self, event: ServerEvent) -> Result<Option<ServerEvent>> {
        match event {
            ServerEvent::UserStatus(event) => self.handle_user_status_event(event),
            _ => return Ok(Some(event)),
        }
        Ok(None)
    }
}

impl UserStateEventHandler {
    fn handle_user_status_event(&self, event: UserStatusEvent) {
        match event.r#type {
            UserStatusEventType::TypingChanged { is_typing } => {
                if !self
                    .ctx
                    .peer_states
                    .write()
                    .set_typing(&event.user_id, is_typing)
                {
                    return;
                }

                let Some(conversation) = self.ctx.open_conversation() else {
                    return;
                };
                if conversation.other_user_id() != &event.user_id {
                    debug!("Ignoring typing state of {} in background.", event.user_id);
                    return;
                }

                self.client_event_dispatcher.dispatch_conversation_event(
                    &conversation.id,
                    ConversationEventType::ComposingUsersChanged,
                );
            }
            UserStatusEventType::ActivityChanged { is_active } => {
                if !self
                    .ctx
                    .peer_states
                    .write()
                    .set_active(&event.user_id, is_active)
                {
                    return;
                }

                self.client_event_dispatcher
                    .dispatch_event(ClientEvent::PeerActivityChanged {
                        user_id: event.user_id,
                        is_active,
                    });
            }
        }
    }
}
