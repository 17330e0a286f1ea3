// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use crate::domain::shared::models::UserId;

/// Ephemeral typing and activity state of other users as announced by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeerState {
    /// The user is typing in their conversation with us.
    pub is_typing: bool,
    /// The user is active in their conversation with us. Drives the coarser "typing…" badge in
    /// conversation lists.
    pub is_active: bool,
}

#[derive(Debug, Default)]
pub struct PeerStates {
    map: HashMap<UserId, PeerState>,
}

impl PeerStates {
    pub fn get(&self, user_id: &UserId) -> PeerState {
        self.map.get(user_id).copied().unwrap_or_default()
    }

    /// Returns true if the state changed.
    pub fn set_typing(&mut self, user_id: &UserId, is_typing: bool) -> bool {
        self.update(user_id, |state| state.is_typing = is_typing)
    }

    /// Returns true if the state changed.
    pub fn set_active(&mut self, user_id: &UserId, is_active: bool) -> bool {
        self.update(user_id, |state| state.is_active = is_active)
    }

    pub fn typing_users(&self) -> Vec<UserId> {
        let mut users = self
            .map
            .iter()
            .filter(|(_, state)| state.is_typing)
            .map(|(user_id, _)| user_id.clone())
            .collect::<Vec<_>>();
        users.sort();
        users
    }

    pub fn clear(&mut self) {
        self.map.clear()
    }

    fn update(&mut self, user_id: &UserId, f: impl FnOnce(&mut PeerState)) -> bool {
        let state = self.map.entry(user_id.clone()).or_default();
        let old_state = *state;
        f(state);
        let changed = *state != old_state;

        if *state == PeerState::default() {
            self.map.remove(user_id);
        }
        changed
    }
}
