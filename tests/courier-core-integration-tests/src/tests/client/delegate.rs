// courier/courier-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use parking_lot::Mutex;

use courier_core::{Client, ClientDelegate, ClientEvent};

#[derive(Clone, Default)]
pub struct Delegate {
    events: Arc<Mutex<Vec<ClientEvent>>>,
}

impl Delegate {
    pub fn take_events(&self) -> Vec<ClientEvent> {
        self.events.lock().drain(..).collect()
    }
}

impl ClientDelegate for Delegate {
    fn handle_event(&self, _client: Client, event: ClientEvent) {
        self.events.lock().push(event);
    }
}
