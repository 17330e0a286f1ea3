// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use tracing::{debug, error};

use crate::app::event_handlers::ServerEventHandler;
use crate::domain::shared::models::ServerEvent;

/// Passes every event through a chain of handlers until one of them consumes it.
pub struct ServerEventHandlerQueue {
    handlers: Vec<Box<dyn ServerEventHandler>>,
}

impl ServerEventHandlerQueue {
    pub fn new(handlers: Vec<Box<dyn ServerEventHandler>>) -> Self {
        Self { handlers }
    }

    pub async fn handle_event(&self, event: ServerEvent) {
        let mut event = event;

        for handler in self.handlers.iter() {
            match handler.handle_event(event).await {
                Ok(None) => return,
                Ok(Some(e)) => event = e,
                Err(err) => {
                    error!(
                        "Event handler '{}' aborted with error: {}",
                        handler.name(),
                        err.to_string()
                    );
                    return;
                }
            }
        }

        debug!("Unhandled event {:?}", event);
    }
}
