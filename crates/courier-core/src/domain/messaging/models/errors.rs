// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use super::MessageId;

/// Rejections of a compose action. None of them emit a transport event.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ComposeError {
    #[error("Cannot send an empty message.")]
    EmptyMessage,
    #[error("Cannot replace a message with empty content.")]
    EmptyEdit,
    #[error("Message '{0}' is unknown.")]
    UnknownMessage(MessageId),
    #[error("Message '{0}' cannot be edited.")]
    EditNotPermitted(MessageId),
    #[error("The selection contains messages that cannot be deleted for everyone.")]
    DeleteForEveryoneNotPermitted,
    #[error("The connection to the server is lost. Please refresh.")]
    NotConnected,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ArchiveError {
    #[error("No chat exists between these users.")]
    NoChatExists,
}
