// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use courier_wasm_utils::{SendUnlessWasm, SyncUnlessWasm};

use crate::domain::conversations::models::ConversationInternals;

/// Drives the `SENT → DELIVERED → READ` handshake. Both transitions are observed by the receiving
/// side and are best-effort; duplicates are harmless since status updates never regress.
#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
#[cfg_attr(feature = "test", mockall::automock)]
pub trait ReceiptsDomainService: SendUnlessWasm + SyncUnlessWasm {
    /// Marks all of the local user's `SENT` messages as delivered after the other participant was
    /// seen online.
    async fn handle_peer_online(&self, conversation: &ConversationInternals) -> Result<()>;

    /// Runs a read pass after the configured delay unless another pass is scheduled in the
    /// meantime or the conversation is closed.
    fn schedule_read_pass(&self, conversation: Arc<ConversationInternals>);

    /// Marks every delivered message from the other participant as read and sends one receipt per
    /// message. Does nothing while the view is not scrolled to the bottom.
    async fn perform_read_pass(&self, conversation: &ConversationInternals) -> Result<()>;
}
