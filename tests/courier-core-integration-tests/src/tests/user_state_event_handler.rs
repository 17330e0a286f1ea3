// courier/courier-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use mockall::predicate;

use courier_core::app::event_handlers::{ServerEventHandler, UserStateEventHandler};
use courier_core::domain::shared::models::{ServerEvent, UserStatusEvent, UserStatusEventType};
use courier_core::dtos::UserId;
use courier_core::test::mock_data;
use courier_core::{ClientEvent, ConversationEventType};

use super::connected_deps_with_conversation;

fn typing_event(user_id: impl Into<UserId>, is_typing: bool) -> ServerEvent {
    ServerEvent::UserStatus(UserStatusEvent {
        user_id: user_id.into(),
        r#type: UserStatusEventType::TypingChanged { is_typing },
    })
}

#[tokio::test]
async fn test_typing_of_other_participant_is_dispatched_once() -> Result<()> {
    let (mut deps, _internals) = connected_deps_with_conversation([]);

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .times(2)
        .with(
            predicate::eq(mock_data::conversation_id()),
            predicate::eq(ConversationEventType::ComposingUsersChanged),
        )
        .return_const(());

    let deps = deps.into_deps();
    let event_handler = UserStateEventHandler::from(&deps);

    event_handler.handle_event(typing_event("bob", true)).await?;
    // Repeated indicators don't change anything.
    event_handler.handle_event(typing_event("bob", true)).await?;
    assert!(deps.ctx.peer_states.read().get(&"bob".into()).is_typing);

    event_handler.handle_event(typing_event("bob", false)).await?;
    assert!(!deps.ctx.peer_states.read().get(&"bob".into()).is_typing);

    Ok(())
}

#[tokio::test]
async fn test_typing_in_background_conversation_is_not_dispatched() -> Result<()> {
    let (mut deps, _internals) = connected_deps_with_conversation([]);

    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .never();

    let deps = deps.into_deps();
    let event_handler = UserStateEventHandler::from(&deps);
    event_handler.handle_event(typing_event("carol", true)).await?;

    assert!(deps.ctx.peer_states.read().get(&"carol".into()).is_typing);

    Ok(())
}

#[tokio::test]
async fn test_activity_changes_are_dispatched() -> Result<()> {
    let (mut deps, _internals) = connected_deps_with_conversation([]);

    deps.client_event_dispatcher
        .expect_dispatch_event()
        .once()
        .with(predicate::eq(ClientEvent::PeerActivityChanged {
            user_id: "carol".into(),
            is_active: true,
        }))
        .return_once(|_| ());

    let event_handler = UserStateEventHandler::from(&deps.into_deps());

    for _ in 0..2 {
        event_handler
            .handle_event(ServerEvent::UserStatus(UserStatusEvent {
                user_id: "carol".into(),
                r#type: UserStatusEventType::ActivityChanged { is_active: true },
            }))
            .await?;
    }

    Ok(())
}
