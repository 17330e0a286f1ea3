// courier/courier-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use mockall::predicate;
use pretty_assertions::assert_eq;

use courier_core::domain::conversations::models::ConversationInternals;
use courier_core::domain::messaging::services::impls::ReceiptsDomainService;
use courier_core::domain::messaging::services::ReceiptsDomainService as _;
use courier_core::dtos::{MessageId, MessageStatus};
use courier_core::test::{mock_data, MessageBuilder, MockReceiptsDomainServiceDependencies};
use courier_core::ConversationEventType;

fn status_of(internals: &ConversationInternals, id: &str) -> Option<MessageStatus> {
    internals
        .state()
        .messages
        .get(&id.into())
        .map(|message| message.status)
}

#[tokio::test]
async fn test_peer_online_marks_sent_messages_as_delivered() -> Result<()> {
    let mut deps = MockReceiptsDomainServiceDependencies::default();

    let internals = ConversationInternals::mock([
        MessageBuilder::new_with_index(1).build(),
        MessageBuilder::new_with_index(2)
            .set_status(MessageStatus::Delivered)
            .build(),
        MessageBuilder::new_with_index(3).incoming().build(),
    ]);

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
    deps.message_archive_service
        .expect_update_message_status()
        .once()
        .withf(|_, ids, status| {
            ids.to_vec() == vec![MessageId::from("msg-1")] && *status == MessageStatus::Delivered
        })
        .return_once(|_, _, _| Box::pin(async { Ok(()) }));
    deps.messaging_service
        .expect_announce_other_user_online()
        .once()
        .withf(|_, messages| {
            messages.len() == 1
                && messages[0].id == "msg-1".into()
                && messages[0].status == MessageStatus::Delivered
        })
        .return_once(|_, _| Box::pin(async { Ok(()) }));

    let service = ReceiptsDomainService::from(deps.into_deps());
    service.handle_peer_online(&internals).await?;

    assert_eq!(status_of(&internals, "msg-1"), Some(MessageStatus::Delivered));
    assert_eq!(
        internals
            .state()
            .messages
            .get(&"msg-1".into())
            .and_then(|m| m.delivered_at),
        Some(mock_data::reference_date())
    );
    assert_eq!(status_of(&internals, "msg-3"), Some(MessageStatus::Sent));

    // Nothing left to deliver, so there's nothing to announce.
    service.handle_peer_online(&internals).await?;

    Ok(())
}

#[tokio::test]
async fn test_read_pass_sends_one_receipt_per_message() -> Result<()> {
    let mut deps = MockReceiptsDomainServiceDependencies::default();

    let internals = ConversationInternals::mock([
        MessageBuilder::new_with_index(1)
            .incoming()
            .set_status(MessageStatus::Delivered)
            .build(),
        MessageBuilder::new_with_index(2)
            .incoming()
            .set_status(MessageStatus::Delivered)
            .build(),
        MessageBuilder::new_with_index(3)
            .incoming()
            .set_status(MessageStatus::Read)
            .build(),
        MessageBuilder::new_with_index(4)
            .set_status(MessageStatus::Delivered)
            .build(),
    ]);

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .once()
        .with(
            predicate::eq(mock_data::conversation_id()),
            predicate::eq(ConversationEventType::MessagesUpdated {
                message_ids: vec!["msg-1".into(), "msg-2".into()],
            }),
        )
        .return_once(|_, _| ());
    deps.message_archive_service
        .expect_update_message_status()
        .once()
        .withf(|_, ids, status| ids.len() == 2 && *status == MessageStatus::Read)
        .return_once(|_, _, _| Box::pin(async { Ok(()) }));
    deps.messaging_service
        .expect_send_read_receipt()
        .times(2)
        .withf(|_, message| message.status == MessageStatus::Read)
        .returning(|_, _| Box::pin(async { Ok(()) }));

    let service = ReceiptsDomainService::from(deps.into_deps());
    service.perform_read_pass(&internals).await?;

    assert_eq!(status_of(&internals, "msg-1"), Some(MessageStatus::Read));
    assert_eq!(status_of(&internals, "msg-2"), Some(MessageStatus::Read));
    assert_eq!(status_of(&internals, "msg-4"), Some(MessageStatus::Delivered));

    Ok(())
}

#[tokio::test]
async fn test_read_pass_is_skipped_while_scrolled_up() -> Result<()> {
    let mut deps = MockReceiptsDomainServiceDependencies::default();

    let internals = ConversationInternals::mock_scrolled_up([MessageBuilder::new_with_index(1)
        .incoming()
        .set_status(MessageStatus::Delivered)
        .build()]);

    deps.messaging_service.expect_send_read_receipt().never();

    let service = ReceiptsDomainService::from(deps.into_deps());
    service.perform_read_pass(&internals).await?;

    assert_eq!(status_of(&internals, "msg-1"), Some(MessageStatus::Delivered));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_scheduled_read_passes_are_debounced() -> Result<()> {
    let mut deps = MockReceiptsDomainServiceDependencies::default();

    let internals = Arc::new(ConversationInternals::mock([MessageBuilder::new_with_index(1)
        .incoming()
        .set_status(MessageStatus::Delivered)
        .build()]));

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .once()
        .return_const(());
    deps.message_archive_service
        .expect_update_message_status()
        .once()
        .return_once(|_, _, _| Box::pin(async { Ok(()) }));
    deps.messaging_service
        .expect_send_read_receipt()
        .once()
        .return_once(|_, _| Box::pin(async { Ok(()) }));

    let service = ReceiptsDomainService::from(deps.into_deps());
    service.schedule_read_pass(internals.clone());
    tokio::time::sleep(Duration::from_millis(500)).await;
    service.schedule_read_pass(internals.clone());

    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(status_of(&internals, "msg-1"), Some(MessageStatus::Delivered));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(status_of(&internals, "msg-1"), Some(MessageStatus::Read));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_scheduled_read_pass_is_dropped_after_closing() -> Result<()> {
    let mut deps = MockReceiptsDomainServiceDependencies::default();

    let internals = Arc::new(ConversationInternals::mock([MessageBuilder::new_with_index(1)
        .incoming()
        .set_status(MessageStatus::Delivered)
        .build()]));

    deps.messaging_service.expect_send_read_receipt().never();

    let service = ReceiptsDomainService::from(deps.into_deps());
    service.schedule_read_pass(internals.clone());
    internals.set_closed();

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(status_of(&internals, "msg-1"), Some(MessageStatus::Delivered));

    Ok(())
}
