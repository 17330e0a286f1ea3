// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::app::deps::AppDependencies;
use crate::app::services::conversation::Signal;
use crate::app::services::Conversation;
use crate::client_event::ClientEvent;
use crate::domain::conversations::models::ConversationInternals;
use crate::domain::messaging::models::{ArchiveError, MessageList};
use crate::domain::shared::models::{ConversationId, UserId};

pub struct ConversationsService {
    deps: AppDependencies,
}

impl From<&AppDependencies> for ConversationsService {
    fn from(deps: &AppDependencies) -> Self {
        Self { deps: deps.clone() }
    }
}

impl ConversationsService {
    /// Opens the conversation with `other_user_id`. Only one conversation is open at a time; a
    /// previously opened one is closed first.
    #[tracing::instrument(skip(self))]
    pub async fn open_conversation(&self, other_user_id: &UserId) -> Result<Conversation> {
        let local_user_id = self.deps.ctx.connected_user_id()?;
        let conversation_id = ConversationId::new(local_user_id, other_user_id.clone());

        if let Some(conversation) = self.deps.ctx.conversation(&conversation_id) {
            return Ok(Conversation::new(conversation, &self.deps));
        }

        let messages = match self
            .deps
            .message_archive_service
            .load_messages(&conversation_id)
            .await
        {
            Ok(messages) => messages,
            Err(err) => {
                if let Some(ArchiveError::NoChatExists) = err.downcast_ref::<ArchiveError>() {
                    warn!("Conversation {conversation_id} does not exist (anymore).");
                    self.deps
                        .client_event_dispatcher
                        .dispatch_event(ClientEvent::ConversationUnavailable {
                            conversation_id,
                            leave_after: self.deps.ctx.config.unavailable_conversation_leave_delay,
                        });
                }
                return Err(err);
            }
        };

        let settings = self
            .deps
            .conversation_settings_service
            .load_settings(&conversation_id)
            .await
            .unwrap_or_else(|err| {
                warn!("Failed to load conversation settings. {}", err.to_string());
                Default::default()
            });

        if let Some(previous) = self.deps.ctx.open_conversation() {
            self.close_conversation(&previous.id).await;
        }

        let internals = Arc::new(ConversationInternals::new(
            conversation_id.clone(),
            MessageList::new(messages),
        ));
        internals.state_mut().settings = settings;
        self.deps.ctx.set_open_conversation(internals.clone());

        if self.deps.ctx.is_connected() {
            if let Err(err) = self
                .deps
                .messaging_service
                .join_conversation(&conversation_id)
                .await
            {
                warn!("Failed to join conversation. {}", err.to_string());
            }
        }

        info!("Opened conversation {conversation_id}.");

        let conversation = Conversation::new(internals.clone(), &self.deps);
        conversation.start_presence_polling();
        self.deps
            .receipts_domain_service
            .schedule_read_pass(internals);

        Ok(conversation)
    }

    /// Closes the conversation if it is the open one. Typing and activity indicators that are
    /// still on are turned off before leaving.
    #[tracing::instrument(skip(self))]
    pub async fn close_conversation(&self, conversation_id: &ConversationId) {
        let Some(conversation) = self.deps.ctx.close_conversation(conversation_id) else {
            return;
        };

        for signal in [Signal::Typing, Signal::Activity] {
            if !signal.idle_signal(&conversation).lock().reset() {
                continue;
            }
            if let Err(err) = signal
                .announce(&self.deps.messaging_service, conversation_id, false)
                .await
            {
                warn!("Failed to reset {signal:?} state. {}", err.to_string());
            }
        }

        if self.deps.ctx.is_connected() {
            if let Err(err) = self
                .deps
                .messaging_service
                .leave_conversation(conversation_id)
                .await
            {
                warn!("Failed to leave conversation. {}", err.to_string());
            }
        }
    }
}
