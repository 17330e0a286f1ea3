// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, info};

use courier_proc_macros::DependenciesStruct;
use courier_wasm_utils::{sleep, spawn};

use super::super::ReceiptsDomainService as ReceiptsDomainServiceTrait;
use crate::app::deps::{
    DynAppContext, DynClientEventDispatcher, DynMessageArchiveService, DynMessagingService,
    DynTimeProvider,
};
use crate::domain::conversations::models::ConversationInternals;
use crate::domain::messaging::models::{MessageStatus, StatusUpdate};
use crate::ConversationEventType;

#[derive(Clone, DependenciesStruct)]
pub struct ReceiptsDomainService {
    ctx: DynAppContext,
    client_event_dispatcher: DynClientEventDispatcher,
    message_archive_service: DynMessageArchiveService,
    messaging_service: DynMessagingService,
    time_provider: DynTimeProvider,
}

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
impl ReceiptsDomainServiceTrait for ReceiptsDomainService {
    #[tracing::instrument(skip(self, conversation), fields(conversation = %conversation.id))]
    async fn handle_peer_online(&self, conversation: &ConversationInternals) -> Result<()> {
        let now = self.time_provider.now();

        let delivered_messages = {
            let mut state = conversation.state_mut();
            let ids = state
                .messages
                .mark_sent_messages_delivered(conversation.local_user_id(), now);
            ids.iter()
                .filter_map(|id| state.messages.get(id).cloned())
                .collect::<Vec<_>>()
        };

        if delivered_messages.is_empty() {
            return Ok(());
        }

        let message_ids = delivered_messages
            .iter()
            .map(|message| message.id.clone())
            .collect::<Vec<_>>();

        info!("Marking {} messages as delivered.", message_ids.len());

        self.client_event_dispatcher.dispatch_conversation_event(
            &conversation.id,
            ConversationEventType::MessagesUpdated {
                message_ids: message_ids.clone(),
            },
        );

        self.message_archive_service
            .update_message_status(&conversation.id, &message_ids, MessageStatus::Delivered)
            .await?;
        self.messaging_service
            .announce_other_user_online(&conversation.id, &delivered_messages)
            .await?;

        Ok(())
    }

    fn schedule_read_pass(&self, conversation: Arc<ConversationInternals>) {
        let generation = conversation.next_read_pass_generation();
        let delay = self.ctx.config.read_receipt_delay;
        let service = self.clone();

        spawn(async move {
            sleep(delay).await;

            if !conversation.is_open() || !conversation.is_current_read_pass(generation) {
                return;
            }

            if let Err(err) = service.perform_read_pass(&conversation).await {
                error!("Failed to mark messages as read. {}", err.to_string());
            }
        });
    }

    #[tracing::instrument(skip(self, conversation), fields(conversation = %conversation.id))]
    async fn perform_read_pass(&self, conversation: &ConversationInternals) -> Result<()> {
        let update = StatusUpdate::read(self.time_provider.now());

        let read_messages = {
            let mut state = conversation.state_mut();

            if !state.is_scrolled_to_bottom {
                debug!("Skipping read pass since the conversation is not scrolled to the bottom.");
                return Ok(());
            }

            let ids = state
                .messages
                .unread_delivered_messages(conversation.local_user_id());

            let mut read_messages = vec![];
            for id in ids {
                if !state.messages.apply_status_update(&id, &update) {
                    continue;
                }
                read_messages.extend(state.messages.get(&id).cloned());
            }
            read_messages
        };

        if read_messages.is_empty() {
            return Ok(());
        }

        let message_ids = read_messages
            .iter()
            .map(|message| message.id.clone())
            .collect::<Vec<_>>();

        self.client_event_dispatcher.dispatch_conversation_event(
            &conversation.id,
            ConversationEventType::MessagesUpdated {
                message_ids: message_ids.clone(),
            },
        );

        self.message_archive_service
            .update_message_status(&conversation.id, &message_ids, MessageStatus::Read)
            .await?;

        for message in read_messages.iter() {
            self.messaging_service
                .send_read_receipt(&conversation.id, message)
                .await?;
        }

        Ok(())
    }
}
