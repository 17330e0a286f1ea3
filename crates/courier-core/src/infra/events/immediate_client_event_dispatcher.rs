// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::{OnceLock, Weak};

use tracing::warn;

use crate::app::event_handlers::ClientEventDispatcherTrait;
use crate::client::ClientInner;
use crate::domain::shared::models::ConversationId;
use crate::{Client, ClientDelegate, ClientEvent, ConversationEventType};

/// Hands every event to the delegate as soon as it is dispatched.
pub struct ImmediateClientEventDispatcher {
    client_inner: OnceLock<Weak<ClientInner>>,
    delegate: Option<Box<dyn ClientDelegate>>,
}

impl ImmediateClientEventDispatcher {
    pub fn new(delegate: Option<Box<dyn ClientDelegate>>) -> Self {
        Self {
            client_inner: Default::default(),
            delegate,
        }
    }

    pub(crate) fn set_client_inner(&self, client_inner: Weak<ClientInner>) {
        if self.client_inner.set(client_inner).is_err() {
            warn!("Tried to set client_inner on ImmediateClientEventDispatcher more than once.");
        }
    }
}

impl ClientEventDispatcherTrait for ImmediateClientEventDispatcher {
    fn dispatch_event(&self, event: ClientEvent) {
        self.perform_dispatch_event(event);
    }

    fn dispatch_conversation_event(
        &self,
        conversation_id: &ConversationId,
        event: ConversationEventType,
    ) {
        self.perform_dispatch_event(ClientEvent::ConversationChanged {
            conversation_id: conversation_id.clone(),
            r#type: event,
        });
    }
}

impl ImmediateClientEventDispatcher {
    fn perform_dispatch_event(&self, event: ClientEvent) {
        let Some(delegate) = &self.delegate else {
            return;
        };

        let Some(client_inner) = self.client_inner.get().and_then(Weak::upgrade) else {
            return;
        };

        delegate.handle_event(Client::from(client_inner), event);
    }
}
