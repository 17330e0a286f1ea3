// courier/courier-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use courier_core::domain::conversations::models::ConversationInternals;
use courier_core::dtos::{ConnectionState, Message};
use courier_core::test::{mock_data, MockAppDependencies};

mod client;
mod connection_event_handler;
mod conversations_service;
mod drafts_repository;
mod messages_event_handler;
mod receipts_domain_service;
mod typing;
mod user_state_event_handler;

/// Mock dependencies of a client that is connected as the mock local user and has the
/// conversation with the mock other user open.
pub fn connected_deps_with_conversation(
    messages: impl IntoIterator<Item = Message>,
) -> (MockAppDependencies, Arc<ConversationInternals>) {
    let deps = connected_deps();
    let internals = Arc::new(ConversationInternals::mock(messages));
    deps.ctx.set_open_conversation(internals.clone());
    (deps, internals)
}

pub fn connected_deps() -> MockAppDependencies {
    let deps = MockAppDependencies::default();
    deps.ctx
        .connected_user_id
        .write()
        .replace(mock_data::local_user_id());
    *deps.ctx.connection_state.write() = ConnectionState::Connected;
    deps
}
