// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use message_archive_service::MessageArchiveService;
pub use messaging_service::MessagingService;
pub use receipts_domain_service::ReceiptsDomainService;

pub mod impls;
mod message_archive_service;
mod messaging_service;
mod receipts_domain_service;

#[cfg(feature = "test")]
pub mod mocks {
    pub use super::message_archive_service::MockMessageArchiveService;
    pub use super::messaging_service::MockMessagingService;
    pub use super::receipts_domain_service::MockReceiptsDomainService;
}
