// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::{format_err, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::domain::conversations::models::ConversationSettings;
use crate::domain::conversations::services::ConversationSettingsService;
use crate::domain::messaging::models::{ArchiveError, Message, MessageId, MessageStatus};
use crate::domain::messaging::services::MessageArchiveService;
use crate::domain::shared::models::{ConversationId, UserId};
use crate::domain::user_info::services::UserPresenceService;

const NO_CHAT_EXISTS_CODE: &str = "NO_CHAT_EXISTS";

/// Talks to the GraphQL API of the server for everything that is not pushed over the socket.
pub struct GraphQLService {
    client: reqwest::Client,
    endpoint: Url,
}

impl GraphQLService {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: Value,
    ) -> Result<T> {
        debug!("Executing {operation}…");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&GraphQLRequest { query, variables })
            .send()
            .await
            .with_context(|| format!("Error while posting {operation}"))?
            .error_for_status()?
            .json::<GraphQLResponse>()
            .await
            .with_context(|| format!("Error while decoding {operation} response"))?;

        response.into_result(operation)
    }
}

#[derive(Serialize)]
struct GraphQLRequest {
    query: &'static str,
    variables: Value,
}

#[derive(Deserialize, Debug)]
struct GraphQLResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Deserialize, Debug)]
struct GraphQLError {
    message: String,
    #[serde(default)]
    extensions: Option<GraphQLErrorExtensions>,
}

#[derive(Deserialize, Debug)]
struct GraphQLErrorExtensions {
    code: Option<String>,
}

impl GraphQLError {
    fn is_no_chat_exists(&self) -> bool {
        self.extensions
            .as_ref()
            .and_then(|extensions| extensions.code.as_deref())
            == Some(NO_CHAT_EXISTS_CODE)
            || self.message.to_lowercase().contains("no chat exists")
    }
}

impl GraphQLResponse {
    fn into_result<T: DeserializeOwned>(self, operation: &'static str) -> Result<T> {
        if self.errors.iter().any(GraphQLError::is_no_chat_exists) {
            return Err(ArchiveError::NoChatExists.into());
        }

        if let Some(error) = self.errors.first() {
            return Err(format_err!("{operation} failed: {}", error.message));
        }

        let mut data = self
            .data
            .ok_or_else(|| format_err!("{operation} returned no data"))?;
        let value = data
            .get_mut(operation)
            .map(Value::take)
            .unwrap_or(Value::Null);

        serde_json::from_value(value)
            .with_context(|| format!("Unexpected payload in {operation} response"))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
impl MessageArchiveService for GraphQLService {
    async fn load_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>> {
        self.execute(
            "getMessages",
            "query getMessages($userId: ID!, $otherUserId: ID!) { \
                getMessages(userId: $userId, otherUserId: $otherUserId) { \
                    id sender receiver content timestamp status deliveredAt readAt \
                    senderDFM receiverDFM delForAll repliedTo { id content } wasForwarded \
                    isStarredByCurrentUser isStarredByOtherUser \
                } \
            }",
            json!(conversation_id),
        )
        .await
    }

    async fn delete_messages_for_me(
        &self,
        conversation_id: &ConversationId,
        message_ids: &[MessageId],
    ) -> Result<()> {
        self.execute::<Option<bool>>(
            "deleteMessagesForMe",
            "mutation deleteMessagesForMe($userId: ID!, $otherUserId: ID!, $messageIds: [ID!]!) { \
                deleteMessagesForMe(userId: $userId, otherUserId: $otherUserId, messageIds: $messageIds) \
            }",
            json!({
                "userId": conversation_id.local,
                "otherUserId": conversation_id.other,
                "messageIds": message_ids,
            }),
        )
        .await?;
        Ok(())
    }

    async fn update_message_status(
        &self,
        conversation_id: &ConversationId,
        message_ids: &[MessageId],
        status: MessageStatus,
    ) -> Result<()> {
        self.execute::<Option<bool>>(
            "updateMessageStatus",
            "mutation updateMessageStatus($userId: ID!, $messageIds: [ID!]!, $status: String!) { \
                updateMessageStatus(userId: $userId, messageIds: $messageIds, status: $status) \
            }",
            json!({
                "userId": conversation_id.local,
                "messageIds": message_ids,
                "status": status,
            }),
        )
        .await?;
        Ok(())
    }

    async fn set_message_starred(
        &self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
        is_starred: bool,
    ) -> Result<()> {
        self.execute::<Option<bool>>(
            "starMessage",
            "mutation starMessage($userId: ID!, $messageId: ID!, $isStarred: Boolean!) { \
                starMessage(userId: $userId, messageId: $messageId, isStarred: $isStarred) \
            }",
            json!({
                "userId": conversation_id.local,
                "messageId": message_id,
                "isStarred": is_starred,
            }),
        )
        .await?;
        Ok(())
    }

    async fn load_starred_messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>> {
        self.execute(
            "getStarredMessages",
            "query getStarredMessages($userId: ID!, $otherUserId: ID!) { \
                getStarredMessages(userId: $userId, otherUserId: $otherUserId) { \
                    id sender receiver content timestamp status deliveredAt readAt \
                    senderDFM receiverDFM delForAll repliedTo { id content } wasForwarded \
                    isStarredByCurrentUser isStarredByOtherUser \
                } \
            }",
            json!(conversation_id),
        )
        .await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
impl ConversationSettingsService for GraphQLService {
    async fn load_settings(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<ConversationSettings> {
        let settings = self
            .execute::<Option<ConversationSettings>>(
                "getChatSettings",
                "query getChatSettings($userId: ID!, $otherUserId: ID!) { \
                    getChatSettings(userId: $userId, otherUserId: $otherUserId) { nickname wallpaper } \
                }",
                json!(conversation_id),
            )
            .await?;
        Ok(settings.unwrap_or_default())
    }

    async fn save_settings(
        &self,
        conversation_id: &ConversationId,
        settings: &ConversationSettings,
    ) -> Result<()> {
        self.execute::<Option<ConversationSettings>>(
            "updateChatSettings",
            "mutation updateChatSettings($userId: ID!, $otherUserId: ID!, $nickname: String, $wallpaper: String) { \
                updateChatSettings(userId: $userId, otherUserId: $otherUserId, nickname: $nickname, wallpaper: $wallpaper) { nickname wallpaper } \
            }",
            json!({
                "userId": conversation_id.local,
                "otherUserId": conversation_id.other,
                "nickname": settings.nickname,
                "wallpaper": settings.wallpaper,
            }),
        )
        .await?;
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[async_trait]
impl UserPresenceService for GraphQLService {
    async fn is_user_online(&self, user_id: &UserId) -> Result<bool> {
        let is_online = self
            .execute::<Option<bool>>(
                "isUserOnline",
                "query isUserOnline($userId: ID!) { isUserOnline(userId: $userId) }",
                json!({ "userId": user_id }),
            )
            .await?;
        Ok(is_online.unwrap_or(false))
    }
}
