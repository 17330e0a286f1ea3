// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use system_time_provider::SystemTimeProvider;
pub use uuid_message_id_provider::UuidMessageIdProvider;

mod system_time_provider;
mod uuid_message_id_provider;
