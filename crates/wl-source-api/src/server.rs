//! Process lifetime: build the boundary clients once, serve until shutdown.

use crate::adapters::{
    BusUpdateQueue, HttpIdentityProvider, HttpUpdateQueue, InMemorySourceRegistry,
    StaticIdentityProvider,
};
use crate::domain::config::ServiceConfig;
use crate::domain::error::ServiceError;
use crate::metrics::HandlerMetrics;
use crate::ports::outbound::{IdentityProvider, SourceRegistry, UpdateQueue};
use crate::router::{build_router, AppState};
use crate::service::RequestHandler;
use axum::Router;
use shared_bus::InMemoryCommandBus;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// The three boundary clients, built once per process.
#[derive(Clone)]
pub struct Clients {
    pub identity: Arc<dyn IdentityProvider>,
    pub registry: Arc<dyn SourceRegistry>,
    pub queue: Arc<dyn UpdateQueue>,
    /// Present when commands go to the in-process bus
    pub bus: Option<Arc<InMemoryCommandBus>>,
}

impl Clients {
    /// Choose an adapter per boundary from the configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let identity: Arc<dyn IdentityProvider> = match &config.identity.userinfo_url {
            Some(url) => {
                info!(url = %url, "Using userinfo identity provider");
                Arc::new(HttpIdentityProvider::new(url.clone(), &config.identity)?)
            }
            None => {
                let provider = StaticIdentityProvider::new(config.identity.static_tokens.clone());
                if provider.is_empty() {
                    warn!("No identity provider configured; every request will be rejected");
                } else {
                    warn!(tokens = provider.len(), "Using static token identity provider");
                }
                Arc::new(provider)
            }
        };

        let registry = Arc::new(InMemorySourceRegistry::from_config(&config.registry)?);

        let (queue, bus) = match &config.queue.url {
            Some(url) => {
                info!(url = %url, "Publishing update commands over HTTP");
                let queue: Arc<dyn UpdateQueue> =
                    Arc::new(HttpUpdateQueue::new(url.clone(), &config.queue)?);
                (queue, None)
            }
            None => {
                let bus = Arc::new(InMemoryCommandBus::new());
                info!(queue = %config.queue.name, "Publishing update commands to in-process bus");
                let queue: Arc<dyn UpdateQueue> = Arc::new(BusUpdateQueue::new(
                    Arc::clone(&bus),
                    config.queue.name.clone(),
                ));
                (queue, Some(bus))
            }
        };

        Ok(Self {
            identity,
            registry,
            queue,
            bus,
        })
    }
}

/// HTTP server for the source update API
pub struct SourceUpdateServer {
    config: ServiceConfig,
    state: AppState,
    bus: Option<Arc<InMemoryCommandBus>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    shutdown_rx: oneshot::Receiver<()>,
}

impl SourceUpdateServer {
    /// Validate the configuration and wire the handler to `clients`.
    pub fn new(config: ServiceConfig, clients: Clients) -> Result<Self, ServiceError> {
        config.validate()?;

        let metrics = Arc::new(HandlerMetrics::new());
        let handler = RequestHandler::with_metrics(
            clients.identity,
            clients.registry,
            clients.queue,
            Arc::clone(&metrics),
        );
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        Ok(Self {
            config,
            state: AppState::new(Arc::new(handler), metrics),
            bus: clients.bus,
            shutdown_tx: Some(shutdown_tx),
            shutdown_rx,
        })
    }

    /// Build the default adapters for `config`.
    pub fn from_config(config: ServiceConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        let clients = Clients::from_config(&config)?;
        Self::new(config, clients)
    }

    /// HTTP router over the shared state
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    pub fn metrics(&self) -> Arc<HandlerMetrics> {
        Arc::clone(&self.state.metrics)
    }

    /// In-process command bus, if commands are not sent over HTTP.
    pub fn command_bus(&self) -> Option<Arc<InMemoryCommandBus>> {
        self.bus.clone()
    }

    /// Sender that stops the server when fired or dropped. Only handed out once.
    pub fn shutdown_trigger(&mut self) -> Option<oneshot::Sender<()>> {
        self.shutdown_tx.take()
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(self) -> Result<(), ServiceError> {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServiceError::Bind(format!("{}: {}", addr, e)))?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener until the shutdown trigger fires
    /// or the process receives Ctrl-C.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServiceError> {
        let addr: SocketAddr = listener
            .local_addr()
            .map_err(|e| ServiceError::Bind(e.to_string()))?;
        let router = self.router();
        let shutdown_rx = self.shutdown_rx;
        // Keep the trigger alive for the server's lifetime when nobody took it.
        let _unclaimed_trigger = self.shutdown_tx;

        info!(
            addr = %addr,
            table = %self.config.registry.table_name,
            "Source update API listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_rx => info!("Received shutdown signal"),
                    _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C"),
                }
            })
            .await
            .map_err(|e| ServiceError::Serve(e.to_string()))?;

        info!("Source update API stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::ConfigError;

    #[test]
    fn test_from_default_config() {
        let server = SourceUpdateServer::from_config(ServiceConfig::default()).unwrap();
        assert!(server.command_bus().is_some());
    }

    #[test]
    fn test_http_queue_has_no_bus() {
        let mut config = ServiceConfig::default();
        config.queue.url = Some("http://localhost:9324/queue/updates".into());
        let server = SourceUpdateServer::from_config(config).unwrap();
        assert!(server.command_bus().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ServiceConfig::default();
        config.registry.table_name.clear();
        assert!(matches!(
            SourceUpdateServer::from_config(config),
            Err(ServiceError::Config(ConfigError::MissingTableName))
        ));
    }

    #[test]
    fn test_shutdown_trigger_taken_once() {
        let mut server = SourceUpdateServer::from_config(ServiceConfig::default()).unwrap();
        assert!(server.shutdown_trigger().is_some());
        assert!(server.shutdown_trigger().is_none());
    }

    #[tokio::test]
    async fn test_serve_stops_on_trigger() {
        let mut server = SourceUpdateServer::from_config(ServiceConfig::default()).unwrap();
        let trigger = server.shutdown_trigger().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let handle = tokio::spawn(server.serve(listener));
        trigger.send(()).unwrap();

        assert!(handle.await.unwrap().is_ok());
    }
}
