// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use async_trait::async_trait;

pub use connection_event_handler::ConnectionEventHandler;
use courier_wasm_utils::{SendUnlessWasm, SyncUnlessWasm};
pub use event_handler_queue::ServerEventHandlerQueue;
pub use messages_event_handler::MessagesEventHandler;
pub use user_state_event_handler::UserStateEventHandler;

use crate::domain::shared::models::{ConversationId, ServerEvent};
use crate::{ClientEvent, ConversationEventType};

mod connection_event_handler;
mod event_handler_queue;
mod messages_event_handler;
mod user_state_event_handler;

/// `ServerEventHandler` is a trait representing a handler for validated inbound events.
///
/// If the handler returns `None`, the event has been consumed and no further processing should be
/// done. If it returns `Some(event)`, the event is passed on to the next handler.
#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
pub trait ServerEventHandler: SendUnlessWasm + SyncUnlessWasm {
    fn name(&self) -> &'static str;
    async fn handle_event(&self, event: ServerEvent) -> Result<Option<ServerEvent>>;
}

#[cfg_attr(feature = "test", mockall::automock)]
pub trait ClientEventDispatcherTrait: SendUnlessWasm + SyncUnlessWasm {
    fn dispatch_event(&self, event: ClientEvent);
    fn dispatch_conversation_event(
        &self,
        conversation_id: &ConversationId,
        event: ConversationEventType,
    );
}
