// courier/courier-cli
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use url::Url;

use courier_core::dtos::{AppConfig, MessageId, UserId};
use courier_core::{
    Client, ClientDelegate, ClientEvent, Conversation, ConversationEventType, RemoteServices,
    SqliteDraftsRepository,
};

struct Settings {
    socket_url: Url,
    graphql_url: Url,
    user_id: UserId,
    peer_id: UserId,
    config: AppConfig,
    drafts_db: Option<PathBuf>,
}

impl Settings {
    fn from_env() -> Result<Self> {
        // A missing .env is fine, the variables may come from the shell.
        _ = dotenvy::dotenv();

        let config = match env::var("COURIER_CONFIG") {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config at {path}"))?;
                serde_json::from_str(&json).context("Invalid COURIER_CONFIG")?
            }
            Err(_) => AppConfig::default(),
        };

        Ok(Self {
            socket_url: required_var("COURIER_SOCKET_URL")?.parse()?,
            graphql_url: required_var("COURIER_GRAPHQL_URL")?.parse()?,
            user_id: required_var("COURIER_USER_ID")?.into(),
            peer_id: required_var("COURIER_PEER_ID")?.into(),
            config,
            drafts_db: env::var("COURIER_DRAFTS_DB").ok().map(PathBuf::from),
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("Missing '{name}' in environment"))
}

struct Delegate {}

impl ClientDelegate for Delegate {
    fn handle_event(&self, client: Client, event: ClientEvent) {
        match event {
            ClientEvent::ConnectionStatusChanged { event } => {
                println!("* Connection: {:?}", event);
            }
            ClientEvent::ConversationChanged { r#type, .. } => {
                let Some(conversation) = client.open_conversation_handle() else {
                    return;
                };
                print_conversation_event(&conversation, r#type);
            }
            ClientEvent::PeerActivityChanged { user_id, is_active } => {
                println!("* {user_id} is {}", if is_active { "active" } else { "idle" });
            }
            ClientEvent::BackgroundMessageReceived {
                conversation_id, ..
            } => {
                println!("* New message from {}", conversation_id.other);
            }
            ClientEvent::ConversationUnavailable {
                conversation_id, ..
            } => {
                println!("* No chat exists with {}", conversation_id.other);
            }
        }
    }
}

fn print_conversation_event(conversation: &Conversation, r#type: ConversationEventType) {
    match r#type {
        ConversationEventType::MessagesAppended { message_ids } => {
            for message in message_ids.iter().filter_map(|id| conversation.message(id)) {
                println!("[{}] {}: {}", message.id, message.sender, message.content);
            }
        }
        ConversationEventType::MessagesUpdated { message_ids } => {
            for message in message_ids.iter().filter_map(|id| conversation.message(id)) {
                println!(
                    "* {} is now {} ({:?})",
                    message.id, message.status, message.send_state
                );
            }
        }
        ConversationEventType::MessagesDeleted { message_ids } => {
            for id in message_ids {
                println!("* {id} was deleted");
            }
        }
        ConversationEventType::MessagesNeedReload => print_history(conversation),
        ConversationEventType::UnreadCountChanged { count } => println!("* {count} unread"),
        ConversationEventType::ComposingUsersChanged => {
            if conversation.is_other_user_typing() {
                println!("* {} is typing…", conversation.id().other);
            }
        }
        ConversationEventType::SendFailed { message_id, error } => {
            println!("! Failed to send {message_id}. {error}");
        }
    }
}

fn print_history(conversation: &Conversation) {
    for message in conversation.messages() {
        println!("[{}] {}: {}", message.id, message.sender, message.content);
    }
}

async fn handle_line(conversation: &Conversation, line: &str) -> Result<bool> {
    let line = line.trim();

    match line.split_once(' ').unwrap_or((line, "")) {
        ("/quit", _) => return Ok(false),
        ("/history", _) => print_history(conversation),
        ("/status", _) => println!(
            "{} is {}, {} unread",
            conversation.id().other,
            if conversation.is_other_user_active() { "active" } else { "idle" },
            conversation.unread_count()
        ),
        ("/edit", args) => {
            let Some((id, content)) = args.split_once(' ') else {
                println!("Usage: /edit <message id> <content>");
                return Ok(true);
            };
            conversation.edit_message(&id.into(), content).await?;
        }
        ("/delete", id) => {
            conversation
                .delete_messages_for_everyone(&[MessageId::from(id.trim())])
                .await?;
        }
        ("/retry", id) => conversation.retry_message(&id.trim().into()).await?,
        ("/draft", text) => conversation.save_draft(text).await?,
        _ => {
            conversation.handle_keystroke().await?;
            conversation.send_message(line).await?;
        }
    }

    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Settings::from_env()?;

    let builder = Client::builder()
        .set_websocket_url(settings.socket_url)
        .set_remote_services(RemoteServices::graphql(settings.graphql_url))
        .set_config(settings.config)
        .set_delegate(Some(Box::new(Delegate {})));

    let client = match settings.drafts_db {
        Some(path) => builder
            .set_drafts_repository(SqliteDraftsRepository::open(path)?)
            .build(),
        None => builder.build(),
    };

    println!("Connecting as {}…", settings.user_id);
    client.connect(&settings.user_id).await?;

    let conversation = client.open_conversation(&settings.peer_id).await?;
    print_history(&conversation);

    if let Some(draft) = conversation.load_draft().await? {
        println!("Draft: {}", draft.text);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match handle_line(&conversation, &line).await {
            Ok(true) => (),
            Ok(false) => break,
            Err(err) => println!("! {err}"),
        }
    }

    client.close_conversation(conversation.id()).await;
    client.disconnect().await;
    Ok(())
}
