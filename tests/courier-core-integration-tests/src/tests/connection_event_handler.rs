// courier/courier-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use mockall::predicate;
use pretty_assertions::assert_eq;

use courier_core::app::event_handlers::{ConnectionEventHandler, ServerEventHandler};
use courier_core::domain::shared::models::{ConnectionEvent, ServerEvent};
use courier_core::dtos::{ConnectionError, ConnectionState, MessageId, SendState};
use courier_core::test::{mock_data, MessageBuilder};
use courier_core::{ClientEvent, ConnectionEvent as ClientConnectionEvent, ConversationEventType};

use super::{connected_deps, connected_deps_with_conversation};

#[tokio::test]
async fn test_reconnect_rejoins_and_reloads_open_conversation() -> Result<()> {
    let (mut deps, internals) = connected_deps_with_conversation([
        MessageBuilder::new_with_index(1).build(),
        MessageBuilder::new_with_index(3)
            .set_send_state(SendState::Pending)
            .build(),
    ]);
    *deps.ctx.connection_state.write() = ConnectionState::Disconnected;

    deps.client_event_dispatcher
        .expect_dispatch_event()
        .once()
        .with(predicate::eq(ClientEvent::ConnectionStatusChanged {
            event: ClientConnectionEvent::Connect,
        }))
        .return_once(|_| ());
    deps.messaging_service
        .expect_join_conversation()
        .once()
        .with(predicate::eq(mock_data::conversation_id()))
        .return_once(|_| Box::pin(async { Ok(()) }));
    deps.message_archive_service
        .expect_load_messages()
        .once()
        .with(predicate::eq(mock_data::conversation_id()))
        .return_once(|_| {
            Box::pin(async {
                Ok(vec![
                    MessageBuilder::new_with_index(1).build(),
                    MessageBuilder::new_with_index(2).incoming().build(),
                ])
            })
        });
    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .once()
        .with(
            predicate::eq(mock_data::conversation_id()),
            predicate::eq(ConversationEventType::MessagesNeedReload),
        )
        .return_once(|_, _| ());

    let deps = deps.into_deps();
    let event_handler = ConnectionEventHandler::from(&deps);
    event_handler
        .handle_event(ServerEvent::Connection(ConnectionEvent::Connected))
        .await?;

    assert_eq!(*deps.ctx.connection_state.read(), ConnectionState::Connected);
    assert_eq!(
        internals
            .state()
            .messages
            .iter()
            .map(|m| m.id.clone())
            .collect::<Vec<_>>(),
        vec![
            MessageId::from("msg-1"),
            MessageId::from("msg-2"),
            MessageId::from("msg-3")
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_disconnect_forgets_peer_states() -> Result<()> {
    let mut deps = connected_deps();
    deps.ctx.peer_states.write().set_typing(&"bob".into(), true);

    deps.client_event_dispatcher
        .expect_dispatch_event()
        .once()
        .with(predicate::eq(ClientEvent::ConnectionStatusChanged {
            event: ClientConnectionEvent::Disconnect {
                error: Some(ConnectionError::TimedOut),
            },
        }))
        .return_once(|_| ());

    let deps = deps.into_deps();
    let event_handler = ConnectionEventHandler::from(&deps);
    event_handler
        .handle_event(ServerEvent::Connection(ConnectionEvent::Disconnected {
            error: Some(ConnectionError::TimedOut),
        }))
        .await?;

    assert_eq!(
        *deps.ctx.connection_state.read(),
        ConnectionState::Disconnected
    );
    assert!(!deps.ctx.peer_states.read().get(&"bob".into()).is_typing);

    Ok(())
}
