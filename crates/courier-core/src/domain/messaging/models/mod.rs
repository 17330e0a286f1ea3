// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use errors::{ArchiveError, ComposeError};
pub use message::{Message, RepliedTo};
pub use message_content::{
    MessageContent, AUDIO_PATH_PREFIX, FILE_PATH_PREFIX, IMAGE_PATH_PREFIX,
};
pub use message_id::MessageId;
pub use message_list::{MessageList, ReceiveOutcome, RemovedMessage};
pub use message_status::{MessageStatus, SendState, StatusUpdate};

mod errors;
mod message;
mod message_content;
mod message_id;
mod message_list;
mod message_status;
