// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use receipts_domain_service::{ReceiptsDomainService, ReceiptsDomainServiceDependencies};

mod receipts_domain_service;
