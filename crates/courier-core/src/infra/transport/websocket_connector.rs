// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as Frame;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::domain::connection::models::{ConnectionError, ReconnectPolicy};
use crate::domain::shared::models::UserId;

use super::{
    Connection as ConnectionTrait, ConnectionEvent, ConnectionEventHandler,
    Connector as ConnectorTrait, InboundEvent, OutboundEvent,
};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connects to a WebSocket endpoint that exchanges JSON text frames.
pub struct WebSocketConnector {
    url: Url,
    reconnect_policy: ReconnectPolicy,
}

impl WebSocketConnector {
    pub fn new(url: Url, reconnect_policy: ReconnectPolicy) -> Self {
        Self {
            url,
            reconnect_policy,
        }
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        self.reconnect_policy
    }

    fn url_for(&self, user_id: &UserId) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("userId", user_id.as_ref());
        url
    }
}

#[async_trait]
impl ConnectorTrait for WebSocketConnector {
    async fn connect(
        &self,
        user_id: &UserId,
        event_handler: ConnectionEventHandler,
    ) -> Result<Box<dyn ConnectionTrait>, ConnectionError> {
        let url = self.url_for(user_id);
        let socket = open_socket(&url).await?;

        info!("Connected to {} as {user_id}.", self.url);

        Ok(Box::new(Connection::new(
            socket,
            url,
            self.reconnect_policy,
            event_handler,
        )))
    }
}

enum Command {
    Send(String),
    Reconnect,
    Disconnect,
}

enum SessionEnd {
    Closed,
    Dropped(ConnectionError),
}

pub struct Connection {
    commands: UnboundedSender<Command>,
    is_connected: Arc<AtomicBool>,
    _run_handle: JoinHandle<()>,
}

impl Connection {
    fn new(
        socket: Socket,
        url: Url,
        reconnect_policy: ReconnectPolicy,
        event_handler: ConnectionEventHandler,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let is_connected = Arc::new(AtomicBool::new(true));

        let run_handle = tokio::spawn(run(
            socket,
            url,
            reconnect_policy,
            rx,
            is_connected.clone(),
            event_handler,
        ));

        Connection {
            commands: tx,
            is_connected,
            _run_handle: run_handle,
        }
    }
}

impl ConnectionTrait for Connection {
    fn send_event(&self, event: OutboundEvent) -> Result<()> {
        if !self.is_connected() {
            return Err(ConnectionError::NotConnected.into());
        }
        let text = serde_json::to_string(&event)?;
        self.commands
            .send(Command::Send(text))
            .map_err(|_| ConnectionError::NotConnected)?;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::Acquire)
    }

    fn reconnect_now(&self) {
        _ = self.commands.send(Command::Reconnect);
    }

    fn disconnect(&self) {
        _ = self.commands.send(Command::Disconnect);
    }
}

async fn open_socket(url: &Url) -> Result<Socket, ConnectionError> {
    let (socket, _) = connect_async(url.as_str())
        .await
        .map_err(ConnectionError::generic)?;
    Ok(socket)
}

async fn run(
    socket: Socket,
    url: Url,
    reconnect_policy: ReconnectPolicy,
    mut commands: UnboundedReceiver<Command>,
    is_connected: Arc<AtomicBool>,
    event_handler: ConnectionEventHandler,
) {
    let mut socket = socket;

    loop {
        let error = match run_session(socket, &mut commands, &event_handler).await {
            SessionEnd::Closed => {
                is_connected.store(false, Ordering::Release);
                info!("Connection closed.");
                return;
            }
            SessionEnd::Dropped(error) => error,
        };

        is_connected.store(false, Ordering::Release);
        warn!("Connection lost. {}", error.to_string());
        (event_handler)(ConnectionEvent::Disconnected { error: Some(error) }).await;

        socket = match reconnect(&url, &reconnect_policy, &mut commands).await {
            Some(socket) => socket,
            None => return,
        };

        is_connected.store(true, Ordering::Release);
        info!("Reconnected to {url}.");
        (event_handler)(ConnectionEvent::Reconnected).await;
    }
}

/// Retries until a socket could be opened. Returns `None` if a disconnect was requested in the
/// meantime.
async fn reconnect(
    url: &Url,
    reconnect_policy: &ReconnectPolicy,
    commands: &mut UnboundedReceiver<Command>,
) -> Option<Socket> {
    let mut attempt = 0u32;

    loop {
        let delay = reconnect_policy.delay_for_attempt(attempt);

        tokio::select! {
            _ = tokio::time::sleep(delay) => (),
            command = commands.recv() => match command {
                Some(Command::Reconnect) => debug!("Reconnecting immediately…"),
                Some(Command::Send(_)) => {
                    debug!("Dropping event since the connection is down.");
                    continue;
                }
                Some(Command::Disconnect) | None => return None,
            }
        }

        match open_socket(url).await {
            Ok(socket) => return Some(socket),
            Err(err) => {
                debug!("Reconnect attempt {} failed. {}", attempt + 1, err.to_string());
                attempt = attempt.saturating_add(1);
            }
        }
    }
}

async fn run_session(
    socket: Socket,
    commands: &mut UnboundedReceiver<Command>,
    event_handler: &ConnectionEventHandler,
) -> SessionEnd {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Frame::Text(text))) => match serde_json::from_str::<InboundEvent>(&text) {
                    // Handled inline so that events are applied in the order they arrived.
                    Ok(event) => (event_handler)(ConnectionEvent::Event(event)).await,
                    Err(err) => error!("Dropping malformed event. {}", err.to_string()),
                },
                Some(Ok(Frame::Close(_))) | None => {
                    return SessionEnd::Dropped(ConnectionError::generic(
                        "Connection closed by server",
                    ))
                }
                Some(Ok(_)) => (),
                Some(Err(err)) => return SessionEnd::Dropped(ConnectionError::generic(err)),
            },
            command = commands.recv() => match command {
                Some(Command::Send(text)) => {
                    if let Err(err) = sink.send(Frame::Text(text)).await {
                        return SessionEnd::Dropped(ConnectionError::generic(err));
                    }
                }
                Some(Command::Reconnect) => (),
                Some(Command::Disconnect) | None => {
                    _ = sink.close().await;
                    return SessionEnd::Closed;
                }
            }
        }
    }
}
