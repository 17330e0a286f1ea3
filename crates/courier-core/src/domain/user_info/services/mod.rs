// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use user_presence_service::UserPresenceService;

mod user_presence_service;

#[cfg(feature = "test")]
pub mod mocks {
    pub use super::user_presence_service::MockUserPresenceService;
}
