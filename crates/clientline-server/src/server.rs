use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use clientline_service::ClientService;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// Clientline GraphQL server.
pub struct ClientlineServer {
    config: ServerConfig,
    service: ClientService,
}

impl ClientlineServer {
    pub fn new(config: ServerConfig, service: ClientService) -> Self {
        Self { config, service }
    }

    /// A server over a fresh in-memory store, with the hub sized from
    /// `config.events`.
    pub fn from_config(config: ServerConfig) -> Self {
        let service = ClientService::in_memory(config.events.clone());
        Self::new(config, service)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn service(&self) -> &ClientService {
        &self.service
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(self.service.clone(), &self.config), &self.config)
    }

    pub async fn bind(&self) -> ServerResult<TcpListener> {
        self.config.validate()?;
        Ok(TcpListener::bind(self.config.socket_addr()).await?)
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = self.bind().await?;
        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves. The
    /// event hub is closed on shutdown so open subscriptions complete.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listener.local_addr()?;
        info!(
            "Clientline server listening on http://{}{}",
            addr, self.config.graphql_path
        );
        if self.config.graphiql {
            info!("GraphiQL available at http://{}/graphiql", addr);
        }

        let hub = Arc::clone(self.service.hub());
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("shutting down");
                hub.close();
            })
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
