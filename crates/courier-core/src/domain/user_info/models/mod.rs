// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use idle_signal::{IdleSignal, SignalTouch};
pub use peer_states::{PeerState, PeerStates};

mod idle_signal;
mod peer_states;
