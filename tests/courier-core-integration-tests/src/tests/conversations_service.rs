// courier/courier-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::time::Duration;

use anyhow::Result;
use mockall::predicate;
use pretty_assertions::assert_eq;

use courier_core::app::services::ConversationsService;
use courier_core::dtos::{ArchiveError, ConversationSettings, MessageId};
use courier_core::test::{mock_data, MessageBuilder};
use courier_core::ClientEvent;

use super::{connected_deps, connected_deps_with_conversation};

#[tokio::test]
async fn test_open_conversation_loads_history_and_joins() -> Result<()> {
    let mut deps = connected_deps();

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
    deps.conversation_settings_service
        .expect_load_settings()
        .once()
        .return_once(|_| {
            Box::pin(async {
                Ok(ConversationSettings {
                    nickname: Some("Bobby".to_string()),
                    wallpaper: None,
                })
            })
        });
    deps.messaging_service
        .expect_join_conversation()
        .once()
        .with(predicate::eq(mock_data::conversation_id()))
        .return_once(|_| Box::pin(async { Ok(()) }));
    deps.receipts_domain_service
        .expect_schedule_read_pass()
        .once()
        .return_const(());
    deps.user_presence_service
        .expect_is_user_online()
        .returning(|_| Box::pin(async { Ok(false) }));

    let deps = deps.into_deps();
    let service = ConversationsService::from(&deps);

    let conversation = service
        .open_conversation(&mock_data::other_user_id())
        .await?;

    assert_eq!(conversation.id(), &mock_data::conversation_id());
    assert_eq!(
        conversation
            .messages()
            .into_iter()
            .map(|m| m.id)
            .collect::<Vec<_>>(),
        vec![MessageId::from("msg-1"), MessageId::from("msg-2")]
    );
    assert_eq!(conversation.settings().nickname, Some("Bobby".to_string()));
    assert_eq!(
        deps.ctx.open_conversation().map(|c| c.id.clone()),
        Some(mock_data::conversation_id())
    );

    // Opening the same conversation again doesn't reload anything.
    let again = service
        .open_conversation(&mock_data::other_user_id())
        .await?;
    assert_eq!(again, conversation);

    Ok(())
}

#[tokio::test]
async fn test_unavailable_conversation_is_reported() -> Result<()> {
    let mut deps = connected_deps();

    deps.message_archive_service
        .expect_load_messages()
        .once()
        .return_once(|_| Box::pin(async { Err(ArchiveError::NoChatExists.into()) }));
    deps.client_event_dispatcher
        .expect_dispatch_event()
        .once()
        .with(predicate::eq(ClientEvent::ConversationUnavailable {
            conversation_id: mock_data::conversation_id(),
            leave_after: Duration::from_secs(3),
        }))
        .return_once(|_| ());
    deps.messaging_service.expect_join_conversation().never();

    let deps = deps.into_deps();
    let service = ConversationsService::from(&deps);

    let err = service
        .open_conversation(&mock_data::other_user_id())
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ArchiveError>(),
        Some(&ArchiveError::NoChatExists)
    );
    assert!(deps.ctx.open_conversation().is_none());

    Ok(())
}

#[tokio::test]
async fn test_close_conversation_turns_indicators_off_and_leaves() -> Result<()> {
    let (mut deps, internals) = connected_deps_with_conversation([]);
    internals.typing.lock().touch();

    deps.messaging_service
        .expect_set_user_is_typing()
        .once()
        .with(predicate::eq(mock_data::conversation_id()), predicate::eq(false))
        .return_once(|_, _| Box::pin(async { Ok(()) }));
    deps.messaging_service.expect_set_user_is_active().never();
    deps.messaging_service
        .expect_leave_conversation()
        .once()
        .with(predicate::eq(mock_data::conversation_id()))
        .return_once(|_| Box::pin(async { Ok(()) }));

    let deps = deps.into_deps();
    let service = ConversationsService::from(&deps);
    service
        .close_conversation(&mock_data::conversation_id())
        .await;

    assert!(!internals.is_open());
    assert!(deps.ctx.open_conversation().is_none());

    Ok(())
}
