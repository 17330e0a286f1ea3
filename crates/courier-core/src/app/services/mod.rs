// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use connection_service::ConnectionService;
pub use conversation::Conversation;
pub use conversations_service::ConversationsService;

mod connection_service;
mod conversation;
mod conversations_service;
