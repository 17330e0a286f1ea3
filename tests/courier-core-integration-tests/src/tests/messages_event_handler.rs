// courier/courier-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use anyhow::Result;
use chrono::Duration;
use mockall::predicate;
use pretty_assertions::assert_eq;

use courier_core::app::event_handlers::{MessagesEventHandler, ServerEventHandler};
use courier_core::domain::conversations::models::ConversationInternals;
use courier_core::domain::messaging::models::{MessageList, StatusUpdate};
use courier_core::domain::shared::models::{MessageEvent, MessageEventType, ServerEvent};
use courier_core::dtos::{ConversationId, MessageId, MessageStatus, SendState};
use courier_core::test::{mock_data, MessageBuilder};
use courier_core::{ClientEvent, ConversationEventType};

use super::{connected_deps, connected_deps_with_conversation};

fn message_event(r#type: MessageEventType) -> ServerEvent {
    ServerEvent::Message(MessageEvent { r#type })
}

#[tokio::test]
async fn test_appends_received_message_and_schedules_read_pass() -> Result<()> {
    let (mut deps, internals) = connected_deps_with_conversation([]);

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .once()
        .with(
            predicate::eq(mock_data::conversation_id()),
            predicate::eq(ConversationEventType::MessagesAppended {
                message_ids: vec!["msg-1".into()],
            }),
        )
        .return_once(|_, _| ());
    deps.receipts_domain_service
        .expect_schedule_read_pass()
        .once()
        .return_once(|_| ());

    let event_handler = MessagesEventHandler::from(&deps.into_deps());
    event_handler
        .handle_event(message_event(MessageEventType::Received(
            MessageBuilder::new_with_index(1).incoming().build(),
        )))
        .await?;

    assert_eq!(internals.state().messages.len(), 1);
    assert_eq!(internals.state().unread_count, 0);

    Ok(())
}

#[tokio::test]
async fn test_ignores_replayed_message() -> Result<()> {
    let (mut deps, internals) =
        connected_deps_with_conversation([MessageBuilder::new_with_index(1).incoming().build()]);

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .never();
    deps.receipts_domain_service
        .expect_schedule_read_pass()
        .never();

    let event_handler = MessagesEventHandler::from(&deps.into_deps());
    event_handler
        .handle_event(message_event(MessageEventType::Received(
            MessageBuilder::new_with_index(1)
                .incoming()
                .set_content("Replayed")
                .build(),
        )))
        .await?;

    let state = internals.state();
    assert_eq!(state.messages.len(), 1);
    assert_eq!(
        state.messages.get(&"msg-1".into()).map(|m| m.content.as_str()),
        Some("Message 1")
    );

    Ok(())
}

#[tokio::test]
async fn test_echo_confirms_pending_message() -> Result<()> {
    let (mut deps, internals) = connected_deps_with_conversation([MessageBuilder::new_with_index(1)
        .set_send_state(SendState::Pending)
        .build()]);

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .once()
        .with(
            predicate::eq(mock_data::conversation_id()),
            predicate::eq(ConversationEventType::MessagesUpdated {
                message_ids: vec!["msg-1".into()],
            }),
        )
        .return_once(|_, _| ());
    deps.receipts_domain_service
        .expect_schedule_read_pass()
        .never();

    let event_handler = MessagesEventHandler::from(&deps.into_deps());
    event_handler
        .handle_event(message_event(MessageEventType::Received(
            MessageBuilder::new_with_index(1).build(),
        )))
        .await?;

    let state = internals.state();
    assert_eq!(state.messages.len(), 1);
    assert_eq!(
        state.messages.get(&"msg-1".into()).map(|m| m.send_state),
        Some(SendState::Confirmed)
    );

    Ok(())
}

#[tokio::test]
async fn test_counts_unread_messages_while_scrolled_up() -> Result<()> {
    let (mut deps, internals) = connected_deps_with_conversation([]);
    internals.state_mut().is_scrolled_to_bottom = false;

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .once()
        .with(
            predicate::eq(mock_data::conversation_id()),
            predicate::eq(ConversationEventType::MessagesAppended {
                message_ids: vec!["msg-1".into()],
            }),
        )
        .return_once(|_, _| ());
    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .once()
        .with(
            predicate::eq(mock_data::conversation_id()),
            predicate::eq(ConversationEventType::UnreadCountChanged { count: 1 }),
        )
        .return_once(|_, _| ());
    deps.receipts_domain_service
        .expect_schedule_read_pass()
        .never();

    let event_handler = MessagesEventHandler::from(&deps.into_deps());
    event_handler
        .handle_event(message_event(MessageEventType::Received(
            MessageBuilder::new_with_index(1).incoming().build(),
        )))
        .await?;

    assert_eq!(internals.state().unread_count, 1);

    Ok(())
}

#[tokio::test]
async fn test_message_for_other_conversation_is_reported_as_background_message() -> Result<()> {
    let (mut deps, internals) = connected_deps_with_conversation([]);

    deps.client_event_dispatcher
        .expect_dispatch_event()
        .once()
        .with(predicate::eq(ClientEvent::BackgroundMessageReceived {
            conversation_id: ConversationId::new("alice", "carol"),
            message_id: "msg-1".into(),
        }))
        .return_once(|_| ());

    let event_handler = MessagesEventHandler::from(&deps.into_deps());
    event_handler
        .handle_event(message_event(MessageEventType::Received(
            MessageBuilder::new_with_index(1)
                .set_sender("carol")
                .set_receiver("alice")
                .build(),
        )))
        .await?;

    assert!(internals.state().messages.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_status_never_moves_backwards() -> Result<()> {
    let (mut deps, internals) = connected_deps_with_conversation([MessageBuilder::new_with_index(1)
        .set_status(MessageStatus::Read)
        .set_delivered_at(mock_data::reference_date())
        .set_read_at(mock_data::reference_date())
        .build()]);

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .never();

    let event_handler = MessagesEventHandler::from(&deps.into_deps());
    event_handler
        .handle_event(message_event(MessageEventType::StatusUpdated {
            id: "msg-1".into(),
            update: StatusUpdate::delivered(mock_data::reference_date() + Duration::hours(1)),
        }))
        .await?;

    let state = internals.state();
    let message = state.messages.get(&"msg-1".into()).unwrap();
    assert_eq!(message.status, MessageStatus::Read);
    assert_eq!(message.delivered_at, Some(mock_data::reference_date()));

    Ok(())
}

#[tokio::test]
async fn test_delivered_incoming_message_schedules_read_pass() -> Result<()> {
    let (mut deps, internals) =
        connected_deps_with_conversation([MessageBuilder::new_with_index(1).incoming().build()]);

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .once()
        .with(
            predicate::eq(mock_data::conversation_id()),
            predicate::eq(ConversationEventType::MessagesUpdated {
                message_ids: vec!["msg-1".into()],
            }),
        )
        .return_once(|_, _| ());
    deps.receipts_domain_service
        .expect_schedule_read_pass()
        .once()
        .return_once(|_| ());

    let event_handler = MessagesEventHandler::from(&deps.into_deps());
    event_handler
        .handle_event(message_event(MessageEventType::StatusUpdated {
            id: "msg-1".into(),
            update: StatusUpdate::delivered(mock_data::reference_date()),
        }))
        .await?;

    assert_eq!(
        internals
            .state()
            .messages
            .get(&"msg-1".into())
            .map(|m| m.status),
        Some(MessageStatus::Delivered)
    );

    Ok(())
}

#[tokio::test]
async fn test_edit_only_changes_content() -> Result<()> {
    let original = MessageBuilder::new_with_index(2)
        .incoming()
        .set_status(MessageStatus::Delivered)
        .set_delivered_at(mock_data::reference_date())
        .set_replied_to(1)
        .set_starred()
        .build();

    let (mut deps, internals) = connected_deps_with_conversation([original.clone()]);

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .once()
        .with(
            predicate::eq(mock_data::conversation_id()),
            predicate::eq(ConversationEventType::MessagesUpdated {
                message_ids: vec!["msg-2".into()],
            }),
        )
        .return_once(|_, _| ());

    let event_handler = MessagesEventHandler::from(&deps.into_deps());
    event_handler
        .handle_event(message_event(MessageEventType::Edited {
            id: "msg-2".into(),
            content: "Edited".to_string(),
        }))
        .await?;

    let mut expected = original;
    expected.content = "Edited".to_string();

    assert_eq!(internals.state().messages.get(&"msg-2".into()), Some(&expected));

    Ok(())
}

#[tokio::test]
async fn test_deleted_for_everyone_removes_messages() -> Result<()> {
    let messages = [
        MessageBuilder::new_with_index(1).build(),
        MessageBuilder::new_with_index(2).build(),
        MessageBuilder::new_with_index(3).incoming().build(),
    ];
    let event = || {
        message_event(MessageEventType::DeletedForEveryone {
            ids: vec!["msg-2".into(), "msg-99".into()],
        })
    };

    // Alice deleted her own message and sees it disappear.
    let (mut alice_deps, alice_internals) = connected_deps_with_conversation(messages.clone());

    alice_deps
        .client_event_dispatcher
        .expect_dispatch_conversation_event()
        .once()
        .with(
            predicate::eq(mock_data::conversation_id()),
            predicate::eq(ConversationEventType::MessagesDeleted {
                message_ids: vec!["msg-2".into()],
            }),
        )
        .return_once(|_, _| ());

    MessagesEventHandler::from(&alice_deps.into_deps())
        .handle_event(event())
        .await?;

    // Bob receives the same event on his side of the conversation.
    let mut bob_deps = connected_deps();
    bob_deps
        .ctx
        .connected_user_id
        .write()
        .replace(mock_data::other_user_id());
    let bob_conversation_id =
        ConversationId::new(mock_data::other_user_id(), mock_data::local_user_id());
    let bob_internals = Arc::new(ConversationInternals::new(
        bob_conversation_id.clone(),
        MessageList::new(messages),
    ));
    bob_deps.ctx.set_open_conversation(bob_internals.clone());

    bob_deps
        .client_event_dispatcher
        .expect_dispatch_conversation_event()
        .once()
        .with(
            predicate::eq(bob_conversation_id),
            predicate::eq(ConversationEventType::MessagesDeleted {
                message_ids: vec!["msg-2".into()],
            }),
        )
        .return_once(|_, _| ());

    MessagesEventHandler::from(&bob_deps.into_deps())
        .handle_event(event())
        .await?;

    for internals in [alice_internals, bob_internals] {
        let ids = internals
            .state()
            .messages
            .iter()
            .map(|m| m.id.clone())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![MessageId::from("msg-1"), MessageId::from("msg-3")]);
    }

    Ok(())
}

#[tokio::test]
async fn test_reply_keeps_snapshot_of_original() -> Result<()> {
    let (mut deps, internals) = connected_deps_with_conversation([MessageBuilder::new_with_index(1)
        .set_content("Original")
        .build()]);

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .times(3)
        .return_const(());
    deps.receipts_domain_service
        .expect_schedule_read_pass()
        .return_const(());

    let event_handler = MessagesEventHandler::from(&deps.into_deps());

    event_handler
        .handle_event(message_event(MessageEventType::Received(
            MessageBuilder::new_with_index(2)
                .incoming()
                .set_replied_to(1)
                .build(),
        )))
        .await?;
    event_handler
        .handle_event(message_event(MessageEventType::Edited {
            id: "msg-1".into(),
            content: "Changed".to_string(),
        }))
        .await?;
    event_handler
        .handle_event(message_event(MessageEventType::DeletedForEveryone {
            ids: vec!["msg-1".into()],
        }))
        .await?;

    let state = internals.state();
    let reply = state.messages.get(&"msg-2".into()).unwrap();
    assert_eq!(
        reply.replied_to.as_ref().and_then(|r| r.content.as_deref()),
        Some("Original")
    );
    assert!(!state.messages.contains(&"msg-1".into()));

    Ok(())
}
