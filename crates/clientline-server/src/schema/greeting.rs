use async_graphql::Object;

#[derive(Default)]
pub struct GreetingQuery;

#[Object]
impl GreetingQuery {
    /// Liveness check over GraphQL.
    async fn hello(&self) -> Option<&'static str> {
        Some("hello world")
    }
}
