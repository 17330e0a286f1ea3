// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use connection_error::ConnectionError;
pub use reconnect_policy::ReconnectPolicy;

mod connection_error;
mod reconnect_policy;
