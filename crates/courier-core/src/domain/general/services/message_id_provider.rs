// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::messaging::models::MessageId;

/// Produces ids for messages composed on this device. The server keeps them as-is, which is what
/// lets the echo of an optimistic message be matched with its local copy.
pub trait MessageIdProvider: Send + Sync {
    fn new_id(&self) -> MessageId;
}
