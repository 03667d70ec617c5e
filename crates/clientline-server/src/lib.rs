//! GraphQL server for Clientline.
//!
//! Serves the merged schema over HTTP: queries and mutations are POSTed to
//! the GraphQL path, and subscriptions upgrade a GET on the same path to a
//! WebSocket. Health and info endpoints live under `/v1`.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod schema;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use schema::{build_schema, ClientlineSchema};
pub use server::ClientlineServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app(config: ServerConfig) -> axum::Router {
        ClientlineServer::from_config(config).router()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn graphql_post(query: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "query": query }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let response = app(ServerConfig::default())
            .oneshot(
                Request::builder()
                    .uri("/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn info_endpoint() {
        let response = app(ServerConfig::default())
            .oneshot(
                Request::builder()
                    .uri("/v1/info")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let info = body_json(response).await;
        assert_eq!(info["name"], "clientline-server");
        assert_eq!(info["subscribers"], 0);
        assert_eq!(info["channel_capacity"], 1024);
    }

    #[tokio::test]
    async fn graphql_over_http() {
        let server = ClientlineServer::from_config(ServerConfig::default());
        let router = server.router();

        let response = router
            .clone()
            .oneshot(graphql_post(
                r#"mutation { createOneClient(clientName: "Ana", clientLastName: "Lopez",
                    cellPhones: [{ number: "(555)123-4567" }]) { id clientName } }"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["data"]["createOneClient"]["clientName"], "Ana");

        let response = router
            .oneshot(graphql_post("{ hello getAllClients { clientName } }"))
            .await
            .unwrap();
        let out = body_json(response).await;
        assert_eq!(out["data"]["hello"], "hello world");
        assert_eq!(out["data"]["getAllClients"], json!([{ "clientName": "Ana" }]));
        assert_eq!(server.service().list_clients().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn graphql_errors_carry_code() {
        let response = app(ServerConfig::default())
            .oneshot(graphql_post(
                r#"mutation { createOneClient(clientName: "A", clientLastName: "Lopez", cellPhones: []) { id } }"#,
            ))
            .await
            .unwrap();
        let out = body_json(response).await;
        assert_eq!(out["errors"][0]["extensions"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn custom_graphql_path() {
        let config = ServerConfig {
            graphql_path: "/api".into(),
            ..Default::default()
        };
        let request = Request::builder()
            .method("POST")
            .uri("/api")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "query": "{ hello }" }).to_string()))
            .unwrap();
        let response = app(config).oneshot(request).await.unwrap();
        assert_eq!(body_json(response).await["data"]["hello"], "hello world");
    }

    #[tokio::test]
    async fn graphiql_can_be_disabled() {
        let get = || {
            Request::builder()
                .uri("/graphiql")
                .body(Body::empty())
                .unwrap()
        };
        let response = app(ServerConfig::default()).oneshot(get()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let config = ServerConfig {
            graphiql: false,
            ..Default::default()
        };
        let response = app(config).oneshot(get()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
