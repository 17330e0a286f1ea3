// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use url::Url;

pub use crate::app::deps::AppConfig;
pub use crate::domain::{
    connection::models::{ConnectionError, ReconnectPolicy},
    conversations::models::{ConversationSettings, Draft},
    messaging::models::{
        ArchiveError, ComposeError, Message, MessageContent, MessageId, MessageStatus, RepliedTo,
        SendState, AUDIO_PATH_PREFIX, FILE_PATH_PREFIX, IMAGE_PATH_PREFIX,
    },
    shared::models::{ConnectionState, ConversationId, UserId},
};
