use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use clientline_service::ClientService;

use crate::config::ServerConfig;
use crate::handler;
use crate::schema::{build_schema, ClientlineSchema};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub schema: ClientlineSchema,
    pub service: ClientService,
    pub graphql_path: Arc<str>,
}

impl AppState {
    pub fn new(service: ClientService, config: &ServerConfig) -> Self {
        Self {
            schema: build_schema(service.clone()),
            service,
            graphql_path: Arc::from(config.graphql_path.as_str()),
        }
    }
}

/// Build the axum router with all Clientline endpoints.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route(
            &config.graphql_path,
            get(handler::graphql_ws_handler).post(handler::graphql_handler),
        );
    if config.graphiql {
        router = router.route("/graphiql", get(handler::graphiql_handler));
    }
    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
