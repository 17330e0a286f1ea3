// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::conversations::models::Draft;
use crate::domain::messaging::models::MessageId;
use crate::domain::messaging::repos::DraftsRepository;
use crate::domain::shared::models::ConversationId;

/// Persists drafts in a SQLite database so that they survive restarts.
pub struct SqliteDraftsRepository {
    db: Mutex<Connection>,
}

impl SqliteDraftsRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Connection::open(path)
            .with_context(|| format!("Error opening drafts database at {}", path.display()))?;
        Self::new(db)
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory().context("Error opening drafts database")?)
    }

    fn new(db: Connection) -> Result<Self> {
        db.execute(
            "CREATE TABLE IF NOT EXISTS drafts (
                user_id TEXT NOT NULL,
                other_user_id TEXT NOT NULL,
                text TEXT NOT NULL,
                reply_to TEXT,
                PRIMARY KEY (user_id, other_user_id)
            )",
            [],
        )
        .context("Error creating drafts table")?;

        Ok(Self { db: Mutex::new(db) })
    }
}

#[async_trait]
impl DraftsRepository for SqliteDraftsRepository {
    async fn get(&self, conversation_id: &ConversationId) -> Result<Option<Draft>> {
        self.db
            .lock()
            .query_row(
                "SELECT text, reply_to FROM drafts WHERE user_id = ? AND other_user_id = ?",
                params![conversation_id.local.as_ref(), conversation_id.other.as_ref()],
                |row| {
                    Ok(Draft {
                        text: row.get(0)?,
                        reply_to: row.get::<_, Option<String>>(1)?.map(MessageId::from),
                    })
                },
            )
            .optional()
            .context("Error loading draft")
    }

    async fn set(&self, conversation_id: &ConversationId, draft: Option<&Draft>) -> Result<()> {
        let db = self.db.lock();

        match draft.filter(|draft| !draft.is_empty()) {
            Some(draft) => db
                .execute(
                    "INSERT OR REPLACE INTO drafts (user_id, other_user_id, text, reply_to) \
                     VALUES (?, ?, ?, ?)",
                    params![
                        conversation_id.local.as_ref(),
                        conversation_id.other.as_ref(),
                        draft.text,
                        draft.reply_to.as_ref().map(|id| id.as_ref())
                    ],
                )
                .context("Error saving draft")?,
            None => db
                .execute(
                    "DELETE FROM drafts WHERE user_id = ? AND other_user_id = ?",
                    params![conversation_id.local.as_ref(), conversation_id.other.as_ref()],
                )
                .context("Error removing draft")?,
        };

        Ok(())
    }
}
