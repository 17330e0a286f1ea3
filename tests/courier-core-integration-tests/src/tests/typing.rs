// courier/courier-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use courier_core::test::MockAppDependencies;
use courier_core::Conversation;

use super::connected_deps_with_conversation;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sent {
    Typing(bool),
    Active(bool),
}

/// Records every typing and activity event the conversation sends.
fn record_indicators(deps: &mut MockAppDependencies) -> Arc<Mutex<Vec<Sent>>> {
    let sent = Arc::new(Mutex::new(vec![]));

    let log = sent.clone();
    deps.messaging_service
        .expect_set_user_is_typing()
        .returning(move |_, is_typing| {
            log.lock().push(Sent::Typing(is_typing));
            Box::pin(async { Ok(()) })
        });

    let log = sent.clone();
    deps.messaging_service
        .expect_set_user_is_active()
        .returning(move |_, is_active| {
            log.lock().push(Sent::Active(is_active));
            Box::pin(async { Ok(()) })
        });

    sent
}

#[tokio::test(start_paused = true)]
async fn test_keystrokes_turn_indicators_on_once_and_off_after_idle() -> Result<()> {
    let (mut deps, internals) = connected_deps_with_conversation([]);
    let sent = record_indicators(&mut deps);

    let conversation = Conversation::mock(internals, &deps.into_deps());

    for _ in 0..3 {
        conversation.handle_keystroke().await?;
        tokio::time::sleep(Duration::from_millis(400)).await;
    }

    assert_eq!(*sent.lock(), vec![Sent::Typing(true), Sent::Active(true)]);

    // The last keystroke happened at 0.8s, typing stops one second later.
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(
        *sent.lock(),
        vec![Sent::Typing(true), Sent::Active(true), Sent::Typing(false)]
    );

    // Activity stops two seconds after the last keystroke.
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(
        *sent.lock(),
        vec![
            Sent::Typing(true),
            Sent::Active(true),
            Sent::Typing(false),
            Sent::Active(false)
        ]
    );

    // Nothing is sent once both indicators are off.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(sent.lock().len(), 4);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_sending_a_message_stops_typing() -> Result<()> {
    let (mut deps, internals) = connected_deps_with_conversation([]);
    let sent = record_indicators(&mut deps);

    deps.connection_service
        .expect_is_connected()
        .return_const(true);
    deps.client_event_dispatcher
        .expect_dispatch_conversation_event()
        .return_const(());
    deps.messaging_service
        .expect_send_message()
        .once()
        .return_once(|_| Box::pin(async { Ok(()) }));

    let conversation = Conversation::mock(internals, &deps.into_deps());

    conversation.handle_keystroke().await?;
    conversation.send_message("Hi").await?;

    assert_eq!(
        *sent.lock(),
        vec![Sent::Typing(true), Sent::Active(true), Sent::Typing(false)]
    );

    // The pending idle timer must not send a second `typing: false`.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(
        *sent.lock(),
        vec![Sent::Typing(true), Sent::Active(true), Sent::Typing(false)]
    );

    Ok(())
}
