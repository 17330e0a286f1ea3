// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use conversation_internals::{ConversationInternals, ConversationState};
pub use conversation_settings::ConversationSettings;
pub use draft::Draft;

mod conversation_internals;
mod conversation_settings;
mod draft;
