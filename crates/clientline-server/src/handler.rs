use async_graphql::http::{GraphiQLSource, ALL_WEBSOCKET_PROTOCOLS};
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;

use crate::router::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "clientline-server",
        "version": env!("CARGO_PKG_VERSION"),
        "graphql_path": &*state.graphql_path,
        "subscribers": state.service.hub().subscriber_count(),
        "channel_capacity": state.service.hub().config().channel_capacity,
    }))
}

/// Queries and mutations over HTTP POST.
pub async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

/// Subscriptions over WebSocket. Both `graphql-transport-ws` and the
/// legacy `graphql-ws` subprotocols are accepted.
pub async fn graphql_ws_handler(
    State(state): State<AppState>,
    protocol: GraphQLProtocol,
    upgrade: WebSocketUpgrade,
) -> Response {
    let schema = state.schema.clone();
    upgrade
        .protocols(ALL_WEBSOCKET_PROTOCOLS)
        .on_upgrade(move |stream| GraphQLWebSocket::new(stream, schema, protocol).serve())
}

pub async fn graphiql_handler(State(state): State<AppState>) -> impl IntoResponse {
    Html(
        GraphiQLSource::build()
            .endpoint(&state.graphql_path)
            .subscription_endpoint(&state.graphql_path)
            .finish(),
    )
}
