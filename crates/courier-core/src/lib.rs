// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use app::dtos;
pub use app::services::Conversation;
pub use client::{Client, ClientDelegate};
pub use client_builder::{ClientBuilder, RemoteServices};
pub use client_event::{ClientEvent, ConnectionEvent, ConversationEventType};
pub use infra::messaging::InMemoryDraftsRepository;
#[cfg(not(target_arch = "wasm32"))]
pub use infra::messaging::SqliteDraftsRepository;

#[cfg(feature = "test")]
pub mod test;

pub mod app;
mod client;
mod client_builder;
mod client_event;

#[cfg(feature = "test")]
pub mod domain;
#[cfg(not(feature = "test"))]
pub(crate) mod domain;

#[cfg(feature = "test")]
pub mod infra;
#[cfg(not(feature = "test"))]
pub(crate) mod infra;
