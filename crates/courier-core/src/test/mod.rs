// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use constant_time_provider::ConstantTimeProvider;
pub use incrementing_message_id_provider::IncrementingMessageIdProvider;
pub use message_builder::MessageBuilder;
pub use mock_app_dependencies::{MockAppDependencies, MockReceiptsDomainServiceDependencies};


pub mod mock_data {
    pub use super::mock_app_dependencies::{
        mock_conversation_id as conversation_id, mock_local_user_id as local_user_id,
        mock_other_user_id as other_user_id, mock_reference_date as reference_date,
    };
}
