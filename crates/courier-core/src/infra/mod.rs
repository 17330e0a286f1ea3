// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub mod connection;
pub mod events;
pub mod general;
#[cfg(not(target_arch = "wasm32"))]
pub mod graphql;
pub mod messaging;
pub mod transport;
