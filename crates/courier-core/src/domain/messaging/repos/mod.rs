// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use drafts_repository::DraftsRepository;

mod drafts_repository;

#[cfg(feature = "test")]
pub mod mocks {
    pub use super::drafts_repository::MockDraftsRepository;
}
