// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use connection_state::ConnectionState;
pub use conversation_id::ConversationId;
pub use server_event::{
    ConnectionEvent, MessageEvent, MessageEventType, ServerEvent, UserStatusEvent,
    UserStatusEventType,
};
pub use user_id::UserId;

mod connection_state;
mod conversation_id;
mod server_event;
mod user_id;
