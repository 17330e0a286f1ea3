// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The delivery status of a message. Variants are ordered, a message may only move forward.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    #[default]
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    /// Returns true if moving from `self` to `next` is a forward transition.
    pub fn can_advance_to(&self, next: MessageStatus) -> bool {
        next > *self
    }
}

/// Tracks whether an optimistically inserted message made it to the server.
///
/// This state is never transmitted. Messages received from the server are always `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    /// The message was inserted locally and we're waiting for the server's echo.
    Pending,
    #[default]
    Confirmed,
    /// The message could not be transmitted and needs to be retried.
    Failed,
}

/// The set of fields a status event may change.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: MessageStatus,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
}

impl StatusUpdate {
    pub fn delivered(at: DateTime<Utc>) -> Self {
        Self {
            status: MessageStatus::Delivered,
            delivered_at: Some(at),
            read_at: None,
        }
    }

    pub fn read(at: DateTime<Utc>) -> Self {
        Self {
            status: MessageStatus::Read,
            delivered_at: None,
            read_at: Some(at),
        }
    }
}
