// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::UserId;

/// Identifies a one-to-one conversation from the point of view of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationId {
    #[serde(rename = "userId")]
    pub local: UserId,
    #[serde(rename = "otherUserId")]
    pub other: UserId,
}

impl ConversationId {
    pub fn new(local: impl Into<UserId>, other: impl Into<UserId>) -> Self {
        Self {
            local: local.into(),
            other: other.into(),
        }
    }

    /// Returns true if a message between `sender` and `receiver` belongs to this conversation,
    /// regardless of its direction.
    pub fn involves(&self, sender: &UserId, receiver: &UserId) -> bool {
        (sender == &self.local && receiver == &self.other)
            || (sender == &self.other && receiver == &self.local)
    }

    /// The same conversation as seen from the other participant.
    pub fn reversed(&self) -> Self {
        Self {
            local: self.other.clone(),
            other: self.local.clone(),
        }
    }
}

impl Display for ConversationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.local, self.other)
    }
}
