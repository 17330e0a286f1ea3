// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use courier_wasm_utils::{sleep, spawn};

use crate::app::deps::{
    AppConfig, AppDependencies, DynAppContext, DynClientEventDispatcher, DynConnectionService,
    DynConversationSettingsService, DynDraftsRepository, DynMessageArchiveService,
    DynMessageIdProvider, DynMessagingService, DynReceiptsDomainService, DynTimeProvider,
    DynUserPresenceService,
};
use crate::domain::conversations::models::{ConversationInternals, ConversationSettings, Draft};
use crate::domain::messaging::models::{
    ComposeError, Message, MessageId, RepliedTo, SendState,
};
use crate::domain::shared::models::{ConversationId, UserId};
use crate::domain::user_info::models::IdleSignal;
use crate::ConversationEventType;

/// The conversation that is currently open. All compose actions go through here.
#[derive(Clone)]
pub struct Conversation {
    inner: Arc<ConversationInner>,
}

pub struct ConversationInner {
    pub(crate) data: Arc<ConversationInternals>,

    pub(crate) ctx: DynAppContext,
    pub(crate) client_event_dispatcher: DynClientEventDispatcher,
    pub(crate) connection_service: DynConnectionService,
    pub(crate) conversation_settings_service: DynConversationSettingsService,
    pub(crate) drafts_repo: DynDraftsRepository,
    pub(crate) message_archive_service: DynMessageArchiveService,
    pub(crate) message_id_provider: DynMessageIdProvider,
    pub(crate) messaging_service: DynMessagingService,
    pub(crate) receipts_domain_service: DynReceiptsDomainService,
    pub(crate) time_provider: DynTimeProvider,
    pub(crate) user_presence_service: DynUserPresenceService,
}

impl Conversation {
    pub(crate) fn new(data: Arc<ConversationInternals>, deps: &AppDependencies) -> Self {
        Self {
            inner: Arc::new(ConversationInner {
                data,
                ctx: deps.ctx.clone(),
                client_event_dispatcher: deps.client_event_dispatcher.clone(),
                connection_service: deps.connection_service.clone(),
                conversation_settings_service: deps.conversation_settings_service.clone(),
                drafts_repo: deps.drafts_repo.clone(),
                message_archive_service: deps.message_archive_service.clone(),
                message_id_provider: deps.message_id_provider.clone(),
                messaging_service: deps.messaging_service.clone(),
                receipts_domain_service: deps.receipts_domain_service.clone(),
                time_provider: deps.time_provider.clone(),
                user_presence_service: deps.user_presence_service.clone(),
            }),
        }
    }
}

impl Deref for Conversation {
    type Target = ConversationInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Debug for Conversation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.data.state();
        f.debug_struct("Conversation")
            .field("id", &self.data.id)
            .field("messages", &state.messages.len())
            .field("unread_count", &state.unread_count)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Conversation {
    fn eq(&self, other: &Self) -> bool {
        self.data.id == other.data.id
    }
}

impl Conversation {
    pub fn id(&self) -> &ConversationId {
        &self.data.id
    }

    /// The messages the local user is allowed to see, in arrival order.
    pub fn messages(&self) -> Vec<Message> {
        let state = self.data.state();
        state
            .messages
            .visible_to(self.data.local_user_id())
            .cloned()
            .collect()
    }

    pub fn message(&self, id: &MessageId) -> Option<Message> {
        self.data.state().messages.get(id).cloned()
    }

    /// The most recent message the local user can see. Always derived from the message list.
    pub fn last_message(&self) -> Option<Message> {
        self.data
            .state()
            .messages
            .last_visible_message(self.data.local_user_id())
            .cloned()
    }

    pub fn unread_count(&self) -> u32 {
        self.data.state().unread_count
    }

    pub fn is_other_user_typing(&self) -> bool {
        self.ctx
            .peer_states
            .read()
            .get(self.data.other_user_id())
            .is_typing
    }

    pub fn is_other_user_active(&self) -> bool {
        self.ctx
            .peer_states
            .read()
            .get(self.data.other_user_id())
            .is_active
    }

    pub fn starred_messages(&self) -> Vec<Message> {
        let state = self.data.state();
        state
            .messages
            .visible_to(self.data.local_user_id())
            .filter(|message| message.is_starred_by_current_user)
            .cloned()
            .collect()
    }

    pub fn settings(&self) -> ConversationSettings {
        self.data.state().settings.clone()
    }
}

impl Conversation {
    /// Inserts the message optimistically and hands it to the server without waiting for an
    /// acknowledgement. The message stays `Pending` until the server echoes it back.
    #[tracing::instrument(skip(self, text), fields(conversation = %self.data.id))]
    pub async fn send_message(&self, text: impl Into<String>) -> Result<MessageId> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ComposeError::EmptyMessage.into());
        }

        let replied_to = self
            .drafts_repo
            .get(&self.data.id)
            .await?
            .and_then(|draft| draft.reply_to)
            .map(RepliedTo::id);

        let message = Message::outgoing(
            self.message_id_provider.new_id(),
            &self.data.id,
            text,
            self.time_provider.now(),
            replied_to,
        );
        let message_id = message.id.clone();

        self.data.state_mut().messages.push_local(message.clone());
        self.dispatch(ConversationEventType::MessagesAppended {
            message_ids: vec![message_id.clone()],
        });

        if let Err(err) = self.drafts_repo.set(&self.data.id, None).await {
            warn!("Failed to clear draft. {}", err.to_string());
        }
        self.stop_typing().await;

        self.transmit(message).await?;
        Ok(message_id)
    }

    /// Sends a message that previously failed again.
    #[tracing::instrument(skip(self), fields(conversation = %self.data.id))]
    pub async fn retry_message(&self, id: &MessageId) -> Result<()> {
        let message = {
            let mut state = self.data.state_mut();
            let Some(message) = state.messages.get(id).cloned() else {
                return Err(ComposeError::UnknownMessage(id.clone()).into());
            };
            if message.send_state != SendState::Failed {
                debug!("Not retrying message {id} since it did not fail.");
                return Ok(());
            }
            state.messages.set_send_state(id, SendState::Pending);
            message
        };

        self.dispatch(ConversationEventType::MessagesUpdated {
            message_ids: vec![id.clone()],
        });

        self.transmit(message).await
    }

    /// Returns true if the local user may edit the message with `id` (and delete it for
    /// everyone). Only the author may do so and only within the configured edit window.
    pub fn can_edit_message(&self, id: &MessageId) -> bool {
        let now = self.time_provider.now();
        let state = self.data.state();
        state
            .messages
            .get(id)
            .map(|message| self.is_modifiable(message, now))
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self, content), fields(conversation = %self.data.id))]
    pub async fn edit_message(&self, id: &MessageId, content: impl Into<String>) -> Result<()> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ComposeError::EmptyEdit.into());
        }

        self.ensure_modifiable(id)?;
        self.ensure_connected().await?;

        let previous_content = {
            let mut state = self.data.state_mut();
            let Some(previous_content) = state.messages.get(id).map(|m| m.content.clone()) else {
                return Err(ComposeError::UnknownMessage(id.clone()).into());
            };
            state.messages.apply_edit(id, content.clone());
            previous_content
        };

        self.dispatch(ConversationEventType::MessagesUpdated {
            message_ids: vec![id.clone()],
        });

        let Err(err) = self
            .messaging_service
            .edit_message(&self.data.id, id, &content)
            .await
        else {
            return Ok(());
        };

        error!("Failed to edit message {id}. {}", err.to_string());

        self.data
            .state_mut()
            .messages
            .apply_edit(id, previous_content);
        self.dispatch(ConversationEventType::MessagesUpdated {
            message_ids: vec![id.clone()],
        });

        Err(err)
    }

    /// Returns true only if every message in `ids` may be deleted for everyone. A selection with
    /// a single message that fails the check is not eligible as a whole.
    pub fn can_delete_for_everyone(&self, ids: &[MessageId]) -> bool {
        if ids.is_empty() {
            return false;
        }

        let now = self.time_provider.now();
        let state = self.data.state();
        ids.iter().all(|id| {
            state
                .messages
                .get(id)
                .map(|message| self.is_modifiable(message, now))
                .unwrap_or(false)
        })
    }

    #[tracing::instrument(skip(self), fields(conversation = %self.data.id))]
    pub async fn delete_messages_for_everyone(&self, ids: &[MessageId]) -> Result<()> {
        if !self.can_delete_for_everyone(ids) {
            return Err(ComposeError::DeleteForEveryoneNotPermitted.into());
        }

        self.ensure_connected().await?;

        let removed = self.data.state_mut().messages.take(ids.iter());
        self.dispatch(ConversationEventType::MessagesDeleted {
            message_ids: removed.iter().map(|r| r.id().clone()).collect(),
        });

        let Err(err) = self
            .messaging_service
            .delete_messages_for_everyone(&self.data.id, ids)
            .await
        else {
            return Ok(());
        };

        error!("Failed to delete messages for everyone. {}", err.to_string());

        self.data.state_mut().messages.restore(removed);
        self.dispatch(ConversationEventType::MessagesNeedReload);

        Err(err)
    }

    /// Hides messages for the local user only. The list is reloaded from the server afterwards
    /// and the resulting last visible message is published so that conversation lists can
    /// update their preview.
    #[tracing::instrument(skip(self), fields(conversation = %self.data.id))]
    pub async fn delete_messages_for_me(&self, ids: &[MessageId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        self.message_archive_service
            .delete_messages_for_me(&self.data.id, ids)
            .await?;

        let messages = self
            .message_archive_service
            .load_messages(&self.data.id)
            .await?;

        let last_message = {
            let mut state = self.data.state_mut();
            state.messages.replace_with_snapshot(messages);
            state
                .messages
                .last_visible_message(self.data.local_user_id())
                .cloned()
        };

        self.dispatch(ConversationEventType::MessagesNeedReload);

        self.messaging_service
            .announce_last_visible_message(&self.data.id, last_message)
            .await
    }

    /// Sends a fresh copy of every message in `ids` to every user in `targets`, one send per
    /// message and target. Returns the ids of the copies.
    #[tracing::instrument(skip(self), fields(conversation = %self.data.id))]
    pub async fn forward_messages(
        &self,
        ids: &[MessageId],
        targets: &[UserId],
    ) -> Result<Vec<MessageId>> {
        let originals = {
            let state = self.data.state();
            ids.iter()
                .map(|id| {
                    state
                        .messages
                        .get(id)
                        .cloned()
                        .ok_or_else(|| ComposeError::UnknownMessage(id.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        if originals.is_empty() || targets.is_empty() {
            return Ok(vec![]);
        }

        self.ensure_connected().await?;

        let mut forwarded_ids = Vec::with_capacity(originals.len() * targets.len());

        for target in targets {
            let conversation_id = ConversationId::new(self.data.local_user_id().clone(), target.clone());
            let is_this_conversation = conversation_id == self.data.id;

            for original in originals.iter() {
                let copy = original.forwarded_copy(
                    self.message_id_provider.new_id(),
                    &conversation_id,
                    self.time_provider.now(),
                );
                forwarded_ids.push(copy.id.clone());

                if is_this_conversation {
                    self.data.state_mut().messages.push_local(copy.clone());
                    self.dispatch(ConversationEventType::MessagesAppended {
                        message_ids: vec![copy.id.clone()],
                    });
                }

                if let Err(err) = self.messaging_service.send_message(&copy).await {
                    if is_this_conversation {
                        self.mark_failed(&copy.id, ComposeError::NotConnected);
                    }
                    return Err(err);
                }
            }
        }

        info!(
            "Forwarded {} messages to {} users.",
            originals.len(),
            targets.len()
        );

        Ok(forwarded_ids)
    }

    /// Stars or unstars the message for the local user. Returns the new state.
    pub async fn toggle_star(&self, id: &MessageId) -> Result<bool> {
        let is_starred = {
            let mut state = self.data.state_mut();
            let Some(message) = state.messages.get(id) else {
                return Err(ComposeError::UnknownMessage(id.clone()).into());
            };
            let is_starred = !message.is_starred_by_current_user;
            state.messages.set_starred_by_current_user(id, is_starred);
            is_starred
        };

        self.dispatch(ConversationEventType::MessagesUpdated {
            message_ids: vec![id.clone()],
        });

        if let Err(err) = self
            .message_archive_service
            .set_message_starred(&self.data.id, id, is_starred)
            .await
        {
            self.data
                .state_mut()
                .messages
                .set_starred_by_current_user(id, !is_starred);
            self.dispatch(ConversationEventType::MessagesUpdated {
                message_ids: vec![id.clone()],
            });
            return Err(err);
        }

        Ok(is_starred)
    }

    /// Loads the starred messages of this conversation from the server, including those that
    /// are not part of the loaded history.
    pub async fn load_starred_messages(&self) -> Result<Vec<Message>> {
        self.message_archive_service
            .load_starred_messages(&self.data.id)
            .await
    }
}

impl Conversation {
    pub async fn set_reply_target(&self, message_id: Option<MessageId>) -> Result<()> {
        if let Some(id) = &message_id {
            if !self.data.state().messages.contains(id) {
                return Err(ComposeError::UnknownMessage(id.clone()).into());
            }
        }

        let mut draft = self.load_draft().await?.unwrap_or_default();
        draft.reply_to = message_id;
        self.drafts_repo.set(&self.data.id, Some(&draft)).await
    }

    pub async fn reply_target(&self) -> Result<Option<MessageId>> {
        Ok(self.load_draft().await?.and_then(|draft| draft.reply_to))
    }

    /// Saves the text of the compose box. A pending reply target is kept.
    pub async fn save_draft(&self, text: impl Into<String>) -> Result<()> {
        let mut draft = self.load_draft().await?.unwrap_or_default();
        draft.text = text.into();
        self.drafts_repo.set(&self.data.id, Some(&draft)).await
    }

    pub async fn load_draft(&self) -> Result<Option<Draft>> {
        self.drafts_repo.get(&self.data.id).await
    }

    pub async fn set_nickname(&self, nickname: Option<String>) -> Result<()> {
        let nickname = normalized(nickname);
        self.update_settings(move |settings| settings.nickname = nickname)
            .await
    }

    pub async fn set_wallpaper(&self, wallpaper: Option<String>) -> Result<()> {
        let wallpaper = normalized(wallpaper);
        self.update_settings(move |settings| settings.wallpaper = wallpaper)
            .await
    }

    async fn update_settings(&self, update: impl FnOnce(&mut ConversationSettings)) -> Result<()> {
        let settings = {
            let mut state = self.data.state_mut();
            update(&mut state.settings);
            state.settings.clone()
        };
        self.conversation_settings_service
            .save_settings(&self.data.id, &settings)
            .await
    }
}

impl Conversation {
    /// Call on every keystroke in the compose box. Drives the typing indicator (short idle
    /// window) and the activity indicator (longer idle window) independently.
    pub async fn handle_keystroke(&self) -> Result<()> {
        self.touch_signal(Signal::Typing).await?;
        self.touch_signal(Signal::Activity).await
    }

    /// Call whenever the view reaches or leaves the bottom of the message list.
    pub fn set_scrolled_to_bottom(&self, is_scrolled_to_bottom: bool) {
        let unread_count_was_reset = {
            let mut state = self.data.state_mut();
            state.is_scrolled_to_bottom = is_scrolled_to_bottom;
            if is_scrolled_to_bottom && state.unread_count > 0 {
                state.unread_count = 0;
                true
            } else {
                false
            }
        };

        if unread_count_was_reset {
            self.dispatch(ConversationEventType::UnreadCountChanged { count: 0 });
        }

        if is_scrolled_to_bottom {
            self.receipts_domain_service
                .schedule_read_pass(self.data.clone());
        }
    }

    /// Polls the other participant's online state for as long as the conversation is open. Their
    /// pending messages are marked as delivered whenever they're seen online.
    pub fn start_presence_polling(&self) {
        let data = self.data.clone();
        let user_presence_service = self.user_presence_service.clone();
        let receipts_domain_service = self.receipts_domain_service.clone();
        let interval = self.ctx.config.presence_poll_interval;

        spawn(async move {
            while data.is_open() {
                match user_presence_service
                    .is_user_online(data.other_user_id())
                    .await
                {
                    Ok(true) => {
                        if let Err(err) = receipts_domain_service.handle_peer_online(&data).await
                        {
                            warn!("Failed to mark messages as delivered. {}", err.to_string());
                        }
                    }
                    Ok(false) => (),
                    Err(err) => debug!("Failed to poll online state. {}", err.to_string()),
                }
                sleep(interval).await;
            }
        });
    }
}

impl Conversation {
    fn dispatch(&self, event: ConversationEventType) {
        self.client_event_dispatcher
            .dispatch_conversation_event(&self.data.id, event);
    }

    fn ensure_modifiable(&self, id: &MessageId) -> Result<()> {
        let now = self.time_provider.now();
        let state = self.data.state();
        let Some(message) = state.messages.get(id) else {
            return Err(ComposeError::UnknownMessage(id.clone()).into());
        };
        if !self.is_modifiable(message, now) {
            return Err(ComposeError::EditNotPermitted(id.clone()).into());
        }
        Ok(())
    }

    fn is_modifiable(&self, message: &Message, now: chrono::DateTime<chrono::Utc>) -> bool {
        message.send_state == SendState::Confirmed
            && message.can_be_modified_by(
                self.data.local_user_id(),
                now,
                self.ctx.config.edit_window,
            )
    }

    /// Hands `message` to the server. If the connection is down, one reconnect is attempted and
    /// the message is marked as failed if the connection is still down after the grace period.
    async fn transmit(&self, message: Message) -> Result<()> {
        let result = match self.ensure_connected().await {
            Ok(()) => self.messaging_service.send_message(&message).await,
            Err(err) => Err(err),
        };

        let Err(err) = result else {
            return Ok(());
        };

        error!("Failed to send message {}. {}", message.id, err.to_string());

        let compose_error = err
            .downcast_ref::<ComposeError>()
            .cloned()
            .unwrap_or(ComposeError::NotConnected);
        self.mark_failed(&message.id, compose_error);

        Err(err)
    }

    fn mark_failed(&self, id: &MessageId, error: ComposeError) {
        self.data
            .state_mut()
            .messages
            .set_send_state(id, SendState::Failed);
        self.dispatch(ConversationEventType::MessagesUpdated {
            message_ids: vec![id.clone()],
        });
        self.dispatch(ConversationEventType::SendFailed {
            message_id: id.clone(),
            error,
        });
    }

    async fn ensure_connected(&self) -> Result<()> {
        if self.connection_service.is_connected() {
            return Ok(());
        }

        warn!("Not connected. Trying to reconnect…");
        if let Err(err) = self.connection_service.reconnect().await {
            warn!("Failed to reconnect. {}", err.to_string());
        }

        sleep(self.ctx.config.connectivity_grace_period).await;

        if !self.connection_service.is_connected() {
            return Err(ComposeError::NotConnected.into());
        }
        Ok(())
    }

    async fn touch_signal(&self, signal: Signal) -> Result<()> {
        let touch = signal.idle_signal(&self.data).lock().touch();

        let data = self.data.clone();
        let messaging_service = self.messaging_service.clone();
        let timeout = signal.idle_timeout(&self.ctx.config);

        spawn(async move {
            sleep(timeout).await;

            if !data.is_open() || !signal.idle_signal(&data).lock().expire(touch.generation) {
                return;
            }

            if let Err(err) = signal.announce(&messaging_service, &data.id, false).await {
                warn!("Failed to reset {signal:?} state. {}", err.to_string());
            }
        });

        if touch.turned_on {
            signal
                .announce(&self.messaging_service, &self.data.id, true)
                .await?;
        }

        Ok(())
    }

    async fn stop_typing(&self) {
        if !self.data.typing.lock().reset() {
            return;
        }
        if let Err(err) = Signal::Typing
            .announce(&self.messaging_service, &self.data.id, false)
            .await
        {
            warn!("Failed to reset typing state. {}", err.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Signal {
    Typing,
    Activity,
}

impl Signal {
    pub(crate) fn idle_signal(self, data: &ConversationInternals) -> &Mutex<IdleSignal> {
        match self {
            Self::Typing => &data.typing,
            Self::Activity => &data.activity,
        }
    }

    fn idle_timeout(self, config: &AppConfig) -> Duration {
        match self {
            Self::Typing => config.typing_idle_timeout,
            Self::Activity => config.activity_idle_timeout,
        }
    }

    pub(crate) async fn announce(
        self,
        messaging_service: &DynMessagingService,
        conversation_id: &ConversationId,
        is_on: bool,
    ) -> Result<()> {
        match self {
            Self::Typing => {
                messaging_service
                    .set_user_is_typing(conversation_id, is_on)
                    .await
            }
            Self::Activity => {
                messaging_service
                    .set_user_is_active(conversation_id, is_on)
                    .await
            }
        }
    }
}

fn normalized(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
