// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::messaging::models::MessageList;
use crate::domain::shared::models::{ConversationId, UserId};
use crate::domain::user_info::models::IdleSignal;

use super::ConversationSettings;

/// The state of the conversation that is currently open.
#[derive(Debug)]
pub struct ConversationInternals {
    pub id: ConversationId,
    state: RwLock<ConversationState>,
    /// Drives the `typing` events.
    pub typing: Mutex<IdleSignal>,
    /// Drives the `userActivity` events.
    pub activity: Mutex<IdleSignal>,
    read_pass_generation: AtomicU64,
    is_open: AtomicBool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    pub messages: MessageList,
    /// Number of messages received while the view was not scrolled to the bottom.
    pub unread_count: u32,
    pub is_scrolled_to_bottom: bool,
    pub settings: ConversationSettings,
}

impl ConversationInternals {
    pub fn new(id: ConversationId, messages: MessageList) -> Self {
        Self {
            id,
            state: RwLock::new(ConversationState {
                messages,
                unread_count: 0,
                is_scrolled_to_bottom: true,
                settings: Default::default(),
            }),
            typing: Default::default(),
            activity: Default::default(),
            read_pass_generation: Default::default(),
            is_open: AtomicBool::new(true),
        }
    }

    pub fn local_user_id(&self) -> &UserId {
        &self.id.local
    }

    pub fn other_user_id(&self) -> &UserId {
        &self.id.other
    }

    pub fn state(&self) -> RwLockReadGuard<'_, ConversationState> {
        self.state.read()
    }

    pub fn state_mut(&self) -> RwLockWriteGuard<'_, ConversationState> {
        self.state.write()
    }

    pub fn is_open(&self) -> bool {
        self.is_open.load(Ordering::Acquire)
    }

    pub fn set_closed(&self) {
        self.is_open.store(false, Ordering::Release)
    }

    /// Starts a new read pass generation. A scheduled read pass only runs if no other one was
    /// scheduled in the meantime.
    pub fn next_read_pass_generation(&self) -> u64 {
        self.read_pass_generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn is_current_read_pass(&self, generation: u64) -> bool {
        self.read_pass_generation.load(Ordering::Acquire) == generation
    }
}

impl ConversationState {
    /// Registers a message from the other participant. Returns true if the unread counter changed.
    pub fn register_incoming_message(&mut self) -> bool {
        if self.is_scrolled_to_bottom {
            return false;
        }
        self.unread_count += 1;
        true
    }
}
