// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use courier_wasm_utils::CourierFutureExt;

use crate::app::deps::{
    AppConfig, AppContext, AppDependencies, DynConversationSettingsService, DynDraftsRepository,
    DynMessageArchiveService, DynMessageIdProvider, DynTimeProvider, DynUserPresenceService,
};
use crate::app::event_handlers::{
    ConnectionEventHandler, MessagesEventHandler, ServerEventHandlerQueue,
    UserStateEventHandler,
};
use crate::app::services::{ConnectionService, ConversationsService};
use crate::client::ClientInner;
use crate::domain::general::services::{MessageIdProvider, TimeProvider};
use crate::domain::messaging::repos::DraftsRepository;
use crate::domain::messaging::services::impls::{
    ReceiptsDomainService, ReceiptsDomainServiceDependencies,
};
use crate::infra::events::ImmediateClientEventDispatcher;
use crate::infra::general::{SystemTimeProvider, UuidMessageIdProvider};
use crate::infra::messaging::InMemoryDraftsRepository;
use crate::infra::transport::{Connector, SocketClient};
#[cfg(not(target_arch = "wasm32"))]
use crate::infra::transport::WebSocketConnector;
use crate::{Client, ClientDelegate};

pub struct UndefinedConnector;
pub struct UndefinedRemoteServices;

/// The transport a client is built with. WebSocket connectors are only created in
/// `ClientBuilder::build` so that they pick up the final `AppConfig`.
pub enum ConnectorSource {
    Connector(Box<dyn Connector>),
    #[cfg(not(target_arch = "wasm32"))]
    WebSocket(url::Url),
}

impl ConnectorSource {
    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    fn into_connector(self, config: &AppConfig) -> Box<dyn Connector> {
        match self {
            ConnectorSource::Connector(connector) => connector,
            #[cfg(not(target_arch = "wasm32"))]
            ConnectorSource::WebSocket(url) => Box::new(websocket_connector(url, config)),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn websocket_connector(url: url::Url, config: &AppConfig) -> WebSocketConnector {
    WebSocketConnector::new(url, config.reconnect)
}

/// The services backed by the request/response API of the server.
#[derive(Clone)]
pub struct RemoteServices {
    pub message_archive_service: DynMessageArchiveService,
    pub conversation_settings_service: DynConversationSettingsService,
    pub user_presence_service: DynUserPresenceService,
}

#[cfg(not(target_arch = "wasm32"))]
impl RemoteServices {
    pub fn graphql(endpoint: url::Url) -> Self {
        let service = Arc::new(crate::infra::graphql::GraphQLService::new(endpoint));
        Self {
            message_archive_service: service.clone(),
            conversation_settings_service: service.clone(),
            user_presence_service: service,
        }
    }
}

pub struct ClientBuilder<C, R> {
    app_config: AppConfig,
    connector: C,
    delegate: Option<Box<dyn ClientDelegate>>,
    drafts_repository: DynDraftsRepository,
    message_id_provider: DynMessageIdProvider,
    remote_services: R,
    time_provider: DynTimeProvider,
}

impl ClientBuilder<UndefinedConnector, UndefinedRemoteServices> {
    pub(crate) fn new() -> Self {
        ClientBuilder {
            app_config: Default::default(),
            connector: UndefinedConnector,
            delegate: None,
            drafts_repository: Arc::new(InMemoryDraftsRepository::default()),
            message_id_provider: Arc::new(UuidMessageIdProvider::default()),
            remote_services: UndefinedRemoteServices,
            time_provider: Arc::new(SystemTimeProvider::default()),
        }
    }
}

impl<R> ClientBuilder<UndefinedConnector, R> {
    pub fn set_connector<C: Connector + 'static>(
        self,
        connector: C,
    ) -> ClientBuilder<ConnectorSource, R> {
        self.set_connector_source(ConnectorSource::Connector(Box::new(connector)))
    }

    /// Connects through a WebSocket at `url`, reconnecting as configured by
    /// `AppConfig::reconnect` at the time `build` is called.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn set_websocket_url(self, url: url::Url) -> ClientBuilder<ConnectorSource, R> {
        self.set_connector_source(ConnectorSource::WebSocket(url))
    }

    fn set_connector_source(self, connector: ConnectorSource) -> ClientBuilder<ConnectorSource, R> {
        ClientBuilder {
            app_config: self.app_config,
            connector,
            delegate: self.delegate,
            drafts_repository: self.drafts_repository,
            message_id_provider: self.message_id_provider,
            remote_services: self.remote_services,
            time_provider: self.time_provider,
        }
    }
}

impl<C> ClientBuilder<C, UndefinedRemoteServices> {
    pub fn set_remote_services(self, remote_services: RemoteServices) -> ClientBuilder<C, RemoteServices> {
        ClientBuilder {
            app_config: self.app_config,
            connector: self.connector,
            delegate: self.delegate,
            drafts_repository: self.drafts_repository,
            message_id_provider: self.message_id_provider,
            remote_services,
            time_provider: self.time_provider,
        }
    }
}

impl<C, R> ClientBuilder<C, R> {
    pub fn set_config(mut self, config: AppConfig) -> Self {
        self.app_config = config;
        self
    }

    pub fn set_delegate(mut self, delegate: Option<Box<dyn ClientDelegate>>) -> Self {
        self.delegate = delegate;
        self
    }

    pub fn set_drafts_repository<D: DraftsRepository + 'static>(mut self, repository: D) -> Self {
        self.drafts_repository = Arc::new(repository);
        self
    }

    pub fn set_message_id_provider<P: MessageIdProvider + 'static>(
        mut self,
        id_provider: P,
    ) -> Self {
        self.message_id_provider = Arc::new(id_provider);
        self
    }

    pub fn set_time_provider<T: TimeProvider + 'static>(mut self, time_provider: T) -> Self {
        self.time_provider = Arc::new(time_provider);
        self
    }
}

impl ClientBuilder<ConnectorSource, RemoteServices> {
    pub fn build(self) -> Client {
        let connector = self.connector.into_connector(&self.app_config);
        let socket_client = Arc::new(SocketClient::new(connector));
        let event_dispatcher = Arc::new(ImmediateClientEventDispatcher::new(self.delegate));
        let ctx = Arc::new(AppContext::new(self.app_config));

        let receipts_domain_service = Arc::new(ReceiptsDomainService::from(
            ReceiptsDomainServiceDependencies {
                ctx: ctx.clone(),
                client_event_dispatcher: event_dispatcher.clone(),
                message_archive_service: self.remote_services.message_archive_service.clone(),
                messaging_service: socket_client.clone(),
                time_provider: self.time_provider.clone(),
            },
        ));

        let dependencies = AppDependencies {
            client_event_dispatcher: event_dispatcher.clone(),
            connection_service: socket_client.clone(),
            conversation_settings_service: self.remote_services.conversation_settings_service,
            ctx,
            drafts_repo: self.drafts_repository,
            message_archive_service: self.remote_services.message_archive_service,
            message_id_provider: self.message_id_provider,
            messaging_service: socket_client.clone(),
            receipts_domain_service,
            time_provider: self.time_provider,
            user_presence_service: self.remote_services.user_presence_service,
        };

        let server_event_handler_queue = Arc::new(ServerEventHandlerQueue::new(vec![
            Box::new(ConnectionEventHandler::from(&dependencies)),
            Box::new(UserStateEventHandler::from(&dependencies)),
            Box::new(MessagesEventHandler::from(&dependencies)),
        ]));

        socket_client.set_event_handler(Arc::new(move |event| {
            let handler_queue = server_event_handler_queue.clone();
            async move { handler_queue.handle_event(event).await }.pinned()
        }));

        let client_inner = Arc::new(ClientInner {
            conversations: ConversationsService::from(&dependencies),
            connection: ConnectionService::from(&dependencies),
            ctx: dependencies.ctx.clone(),
            deps: dependencies,
        });

        event_dispatcher.set_client_inner(Arc::downgrade(&client_inner));

        Client::from(client_inner)
    }
}
