// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use crate::app::deps::app_context::AppContext;
use crate::app::event_handlers::ClientEventDispatcherTrait;
use crate::domain::connection::services::ConnectionService;
use crate::domain::conversations::services::ConversationSettingsService;
use crate::domain::general::services::{MessageIdProvider, TimeProvider};
use crate::domain::messaging::repos::DraftsRepository;
use crate::domain::messaging::services::{
    MessageArchiveService, MessagingService, ReceiptsDomainService,
};
use crate::domain::user_info::services::UserPresenceService;

pub type DynAppContext = Arc<AppContext>;
pub type DynClientEventDispatcher = Arc<dyn ClientEventDispatcherTrait>;
pub type DynConnectionService = Arc<dyn ConnectionService>;
pub type DynConversationSettingsService = Arc<dyn ConversationSettingsService>;
pub type DynDraftsRepository = Arc<dyn DraftsRepository>;
pub type DynMessageArchiveService = Arc<dyn MessageArchiveService>;
pub type DynMessageIdProvider = Arc<dyn MessageIdProvider>;
pub type DynMessagingService = Arc<dyn MessagingService>;
pub type DynReceiptsDomainService = Arc<dyn ReceiptsDomainService>;
pub type DynTimeProvider = Arc<dyn TimeProvider>;
pub type DynUserPresenceService = Arc<dyn UserPresenceService>;

#[derive(Clone)]
pub struct AppDependencies {
    pub client_event_dispatcher: DynClientEventDispatcher,
    pub connection_service: DynConnectionService,
    pub conversation_settings_service: DynConversationSettingsService,
    pub ctx: DynAppContext,
    pub drafts_repo: DynDraftsRepository,
    pub message_archive_service: DynMessageArchiveService,
    pub message_id_provider: DynMessageIdProvider,
    pub messaging_service: DynMessagingService,
    pub receipts_domain_service: DynReceiptsDomainService,
    pub time_provider: DynTimeProvider,
    pub user_presence_service: DynUserPresenceService,
}
