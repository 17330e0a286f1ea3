// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use in_memory_drafts_repository::InMemoryDraftsRepository;
#[cfg(not(target_arch = "wasm32"))]
pub use sqlite_drafts_repository::SqliteDraftsRepository;

mod in_memory_drafts_repository;
mod messaging_service;
#[cfg(not(target_arch = "wasm32"))]
mod sqlite_drafts_repository;
