// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationSettings {
    /// A custom name the local user gave the other participant.
    pub nickname: Option<String>,
    /// Path or URL of the chat background.
    pub wallpaper: Option<String>,
}
