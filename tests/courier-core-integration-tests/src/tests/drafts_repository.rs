// courier/courier-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use pretty_assertions::assert_eq;

use courier_core::domain::messaging::repos::DraftsRepository;
use courier_core::dtos::Draft;
use courier_core::infra::messaging::{InMemoryDraftsRepository, SqliteDraftsRepository};
use courier_core::test::mock_data;

async fn assert_round_trips_drafts(repo: &dyn DraftsRepository) -> Result<()> {
    let conversation_id = mock_data::conversation_id();
    let draft = Draft {
        text: "See you".to_string(),
        reply_to: Some("msg-1".into()),
    };

    assert_eq!(repo.get(&conversation_id).await?, None);

    repo.set(&conversation_id, Some(&draft)).await?;
    assert_eq!(repo.get(&conversation_id).await?, Some(draft));
    // Drafts are scoped to a conversation.
    assert_eq!(repo.get(&conversation_id.reversed()).await?, None);

    repo.set(&conversation_id, Some(&Draft::default())).await?;
    assert_eq!(repo.get(&conversation_id).await?, None);

    Ok(())
}

#[tokio::test]
async fn test_in_memory_drafts_repository() -> Result<()> {
    assert_round_trips_drafts(&InMemoryDraftsRepository::new()).await
}

#[tokio::test]
async fn test_sqlite_drafts_repository_persists_drafts() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("drafts.sqlite");

    assert_round_trips_drafts(&SqliteDraftsRepository::open(&path)?).await?;

    let draft = Draft {
        text: "Persisted".to_string(),
        reply_to: None,
    };
    SqliteDraftsRepository::open(&path)?
        .set(&mock_data::conversation_id(), Some(&draft))
        .await?;

    assert_eq!(
        SqliteDraftsRepository::open(&path)?
            .get(&mock_data::conversation_id())
            .await?,
        Some(draft)
    );

    Ok(())
}
