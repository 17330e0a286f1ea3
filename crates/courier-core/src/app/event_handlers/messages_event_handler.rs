// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use courier_proc_macros::InjectDependencies;

use crate::app::deps::{DynAppContext, DynClientEventDispatcher, DynReceiptsDomainService};
use crate::app::event_handlers::ServerEventHandler;
use crate::domain::messaging::models::{
    Message, MessageId, MessageList, MessageStatus, ReceiveOutcome, StatusUpdate,
};
use crate::domain::shared::models::{
    ConversationId, MessageEvent, MessageEventType, ServerEvent,
};
use crate::{ClientEvent, ConversationEventType};

/// Applies inbound message events to the open conversation.
#[derive(InjectDependencies)]
pub struct MessagesEventHandler {
    #[inject]
    ctx: DynAppContext,
    #[inject]
    client_event_dispatcher: DynClientEventDispatcher,
    #[inject]
    receipts_domain_service: DynReceiptsDomainService,
}

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
impl ServerEventHandler for MessagesEventHandler {
    fn name(&self) -> &'static str {
        "messages"
    }

    async fn handle_event(&self, event: ServerEvent) -> Result<Option<ServerEvent>> {
        match event {
            ServerEvent::Message(event) => self.handle_message_event(event)?,
            _ => return Ok(Some(event)),
        }
        Ok(None)
    }
}

impl MessagesEventHandler {
    fn handle_message_event(&self, event: MessageEvent) -> Result<()> {
        match event.r#type {
            MessageEventType::Received(message) => self.handle_received_message(message)?,
            MessageEventType::StatusUpdated { id, update } => {
                self.handle_status_update(id, update)
            }
            MessageEventType::Edited { id, content } => self.update_open_conversation(|messages| {
                messages
                    .apply_edit(&id, content)
                    .then(|| ConversationEventType::MessagesUpdated {
                        message_ids: vec![id],
                    })
            }),
            MessageEventType::DeletedForEveryone { ids } => {
                self.update_open_conversation(|messages| {
                    let message_ids = messages.remove(ids.iter());
                    (!message_ids.is_empty())
                        .then(|| ConversationEventType::MessagesDeleted { message_ids })
                })
            }
        }
        Ok(())
    }

    fn update_open_conversation(
        &self,
        update: impl FnOnce(&mut MessageList) -> Option<ConversationEventType>,
    ) {
        let Some(conversation) = self.ctx.open_conversation() else {
            debug!("Ignoring message event since no conversation is open.");
            return;
        };

        let event_type = update(&mut conversation.state_mut().messages);

        if let Some(event_type) = event_type {
            self.client_event_dispatcher
                .dispatch_conversation_event(&conversation.id, event_type);
        }
    }

    /// Applies a status update. A message from the other participant that just became
    /// delivered while the view is at the bottom triggers a read pass.
    fn handle_status_update(&self, id: MessageId, update: StatusUpdate) {
        let Some(conversation) = self.ctx.open_conversation() else {
            debug!("Ignoring status update since no conversation is open.");
            return;
        };

        let needs_read_pass = {
            let mut state = conversation.state_mut();
            if !state.messages.apply_status_update(&id, &update) {
                return;
            }
            state.is_scrolled_to_bottom
                && update.status == MessageStatus::Delivered
                && state
                    .messages
                    .get(&id)
                    .map(|message| !message.is_from(conversation.local_user_id()))
                    .unwrap_or(false)
        };

        self.client_event_dispatcher.dispatch_conversation_event(
            &conversation.id,
            ConversationEventType::MessagesUpdated {
                message_ids: vec![id],
            },
        );

        if needs_read_pass {
            self.receipts_domain_service
                .schedule_read_pass(conversation.clone());
        }
    }

    fn handle_received_message(&self, message: Message) -> Result<()> {
        let user_id = self.ctx.connected_user_id()?;

        let conversation = self
            .ctx
            .open_conversation()
            .filter(|conversation| conversation.id.involves(&message.sender, &message.receiver));

        let Some(conversation) = conversation else {
            let other_user_id = if message.is_from(&user_id) {
                message.receiver.clone()
            } else {
                message.sender.clone()
            };
            info!("Received message in background conversation with {other_user_id}.");
            self.client_event_dispatcher
                .dispatch_event(ClientEvent::BackgroundMessageReceived {
                    conversation_id: ConversationId::new(user_id, other_user_id),
                    message_id: message.id,
                });
            return Ok(());
        };

        let message_id = message.id.clone();
        let is_incoming = !message.is_from(conversation.local_user_id());

        let (outcome, unread_count, is_scrolled_to_bottom) = {
            let mut state = conversation.state_mut();
            let outcome = state.messages.insert_received(message);
            let unread_count = (outcome == ReceiveOutcome::Appended
                && is_incoming
                && state.register_incoming_message())
            .then_some(state.unread_count);
            (outcome, unread_count, state.is_scrolled_to_bottom)
        };

        let event_type = match outcome {
            ReceiveOutcome::Duplicate => return Ok(()),
            ReceiveOutcome::Appended => ConversationEventType::MessagesAppended {
                message_ids: vec![message_id],
            },
            ReceiveOutcome::Confirmed | ReceiveOutcome::Updated => {
                ConversationEventType::MessagesUpdated {
                    message_ids: vec![message_id],
                }
            }
        };

        self.client_event_dispatcher
            .dispatch_conversation_event(&conversation.id, event_type);

        if let Some(count) = unread_count {
            self.client_event_dispatcher.dispatch_conversation_event(
                &conversation.id,
                ConversationEventType::UnreadCountChanged { count },
            );
        }

        if is_incoming && is_scrolled_to_bottom {
            self.receipts_domain_service
                .schedule_read_pass(conversation.clone());
        }

        Ok(())
    }
}
