// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use uuid::Uuid;

use crate::domain::general::services::MessageIdProvider;
use crate::domain::messaging::models::MessageId;

#[derive(Default)]
pub struct UuidMessageIdProvider {}

impl MessageIdProvider for UuidMessageIdProvider {
    fn new_id(&self) -> MessageId {
        MessageId::from(Uuid::new_v4().to_string())
    }
}
