// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use conversation_settings_service::ConversationSettingsService;

mod conversation_settings_service;

#[cfg(feature = "test")]
pub mod mocks {
    pub use super::conversation_settings_service::MockConversationSettingsService;
}
