//! The Clientline GraphQL schema.
//!
//! Each feature contributes its own query, mutation and subscription
//! objects; they are merged into one root of each kind here, so adding a
//! feature means adding a field to the tuples below.

mod client;
mod greeting;
pub mod objects;

use async_graphql::{MergedObject, MergedSubscription, Schema};

use clientline_service::ClientService;

pub use client::{ClientMutation, ClientQuery, ClientSubscription};
pub use greeting::GreetingQuery;
pub use objects::{ClientChangeEvent, ClientEventType, ClientNode, PhoneInput, PhoneNode, PhoneUpdateInput};

#[derive(MergedObject, Default)]
#[graphql(name = "Query")]
pub struct QueryRoot(GreetingQuery, ClientQuery);

#[derive(MergedObject, Default)]
#[graphql(name = "Mutation")]
pub struct MutationRoot(ClientMutation);

#[derive(MergedSubscription, Default)]
#[graphql(name = "Subscription")]
pub struct SubscriptionRoot(ClientSubscription);

pub type ClientlineSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Build the executable schema. Resolvers reach `service` through the
/// request context.
pub fn build_schema(service: ClientService) -> ClientlineSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        SubscriptionRoot::default(),
    )
    .data(service)
    .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::{Request, Response, Variables};
    use clientline_service::HubConfig;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tokio_stream::StreamExt;

    fn setup() -> (ClientService, ClientlineSchema) {
        let service = ClientService::in_memory(HubConfig::default());
        (service.clone(), build_schema(service))
    }

    async fn run(schema: &ClientlineSchema, query: &str, vars: Value) -> Response {
        schema
            .execute(Request::new(query).variables(Variables::from_json(vars)))
            .await
    }

    async fn data(schema: &ClientlineSchema, query: &str, vars: Value) -> Value {
        let resp = run(schema, query, vars).await;
        assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
        resp.data.into_json().unwrap()
    }

    fn error_code(resp: &Response) -> Value {
        serde_json::to_value(resp).unwrap()["errors"][0]["extensions"]["code"].clone()
    }

    const CREATE: &str = r#"
        mutation($name: String!, $last: String!, $phones: [PhoneInput!]!) {
            createOneClient(clientName: $name, clientLastName: $last, cellPhones: $phones) {
                id clientName clientLastName cellPhones { numberId number } createdAt updatedAt
            }
        }"#;

    const UPDATE: &str = r#"
        mutation($id: ID!, $name: String, $phones: [PhoneUpdateInput!]) {
            updateOneClient(id: $id, clientName: $name, cellPhones: $phones) {
                id clientName clientLastName cellPhones { numberId number }
            }
        }"#;

    async fn create_ana(schema: &ClientlineSchema) -> Value {
        data(
            schema,
            CREATE,
            json!({ "name": "Ana", "last": "Lopez", "phones": [{ "number": "(555)123-4567" }] }),
        )
        .await["createOneClient"]
            .clone()
    }

    async fn wait_for_subscribers(service: &ClientService, n: usize) {
        for _ in 0..200 {
            if service.hub().subscriber_count() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("subscription never opened");
    }

    #[tokio::test]
    async fn hello_world() {
        let (_, schema) = setup();
        let out = data(&schema, "{ hello }", json!({})).await;
        assert_eq!(out, json!({ "hello": "hello world" }));
    }

    #[test]
    fn sdl_exposes_merged_roots() {
        let (_, schema) = setup();
        let sdl = schema.sdl();
        for field in [
            "hello: String",
            "getAllClients: [Client]",
            "cellPhones: [PhoneInput!]!): Client",
            "cellPhones: [Phone]",
            "getOneClient(",
            "createOneClient(",
            "updateOneClient(",
            "deleteOneClient(",
            "onClientChange",
            "CLIENT_ADDED",
            "type Phone",
            "input PhoneUpdateInput",
        ] {
            assert!(sdl.contains(field), "missing {field} in schema:\n{sdl}");
        }
    }

    #[tokio::test]
    async fn create_then_list() {
        let (_, schema) = setup();
        let created = create_ana(&schema).await;
        assert_eq!(created["clientName"], "Ana");
        assert_eq!(created["cellPhones"][0]["number"], "(555)123-4567");
        assert!(created["cellPhones"][0]["numberId"].as_str().is_some());
        assert_eq!(created["createdAt"], created["updatedAt"]);

        let out = data(&schema, "{ getAllClients { id clientName } }", json!({})).await;
        assert_eq!(out["getAllClients"], json!([{ "id": created["id"], "clientName": "Ana" }]));

        let out = data(
            &schema,
            "query($id: ID!) { getOneClient(id: $id) { clientLastName } }",
            json!({ "id": created["id"] }),
        )
        .await;
        assert_eq!(out["getOneClient"]["clientLastName"], "Lopez");
    }

    #[tokio::test]
    async fn update_phone_list_and_name() {
        let (_, schema) = setup();
        let created = create_ana(&schema).await;
        let number_id = created["cellPhones"][0]["numberId"].clone();

        let out = data(
            &schema,
            UPDATE,
            json!({
                "id": created["id"],
                "name": "Bea",
                "phones": [
                    { "status": "UPDATE", "numberId": number_id, "number": "(111)111-1111" },
                    { "status": "ADD", "number": "(222)222-2222" },
                ],
            }),
        )
        .await;
        let updated = &out["updateOneClient"];
        assert_eq!(updated["clientName"], "Bea");
        assert_eq!(updated["clientLastName"], "Lopez");
        assert_eq!(updated["cellPhones"][0]["numberId"], number_id);
        assert_eq!(updated["cellPhones"][0]["number"], "(111)111-1111");
        assert_eq!(updated["cellPhones"][1]["number"], "(222)222-2222");

        let out = data(
            &schema,
            UPDATE,
            json!({ "id": created["id"], "phones": [{ "status": "delete", "numberId": number_id }] }),
        )
        .await;
        let phones = out["updateOneClient"]["cellPhones"].as_array().unwrap().clone();
        assert_eq!(phones.len(), 1);
        assert_eq!(phones[0]["number"], "(222)222-2222");
    }

    #[tokio::test]
    async fn unknown_id_yields_null() {
        let (_, schema) = setup();
        let missing = clientline_types::ClientId::generate().to_string();

        let out = data(&schema, UPDATE, json!({ "id": missing, "name": "Bea" })).await;
        assert_eq!(out["updateOneClient"], Value::Null);

        let out = data(
            &schema,
            "mutation($id: ID!) { deleteOneClient(id: $id) { id } }",
            json!({ "id": missing }),
        )
        .await;
        assert_eq!(out["deleteOneClient"], Value::Null);

        let out = data(
            &schema,
            "query($id: ID!) { getOneClient(id: $id) { id } }",
            json!({ "id": missing }),
        )
        .await;
        assert_eq!(out["getOneClient"], Value::Null);
    }

    #[tokio::test]
    async fn delete_returns_last_state() {
        let (_, schema) = setup();
        let created = create_ana(&schema).await;
        let out = data(
            &schema,
            "mutation($id: ID!) { deleteOneClient(id: $id) { id clientName } }",
            json!({ "id": created["id"] }),
        )
        .await;
        assert_eq!(out["deleteOneClient"]["clientName"], "Ana");

        let out = data(&schema, "{ getAllClients { id } }", json!({})).await;
        assert_eq!(out["getAllClients"], json!([]));
    }

    #[tokio::test]
    async fn invalid_input_reports_validation_error() {
        let (_, schema) = setup();

        let resp = run(
            &schema,
            CREATE,
            json!({ "name": "A", "last": "Lopez", "phones": [] }),
        )
        .await;
        assert_eq!(error_code(&resp), "VALIDATION_ERROR");

        let resp = run(
            &schema,
            CREATE,
            json!({ "name": "Ana", "last": "Lopez", "phones": [{ "number": "555-123-4567" }] }),
        )
        .await;
        assert_eq!(error_code(&resp), "VALIDATION_ERROR");

        let created = create_ana(&schema).await;
        let resp = run(
            &schema,
            UPDATE,
            json!({ "id": created["id"], "phones": [{ "status": "MOVE", "number": "(111)111-1111" }] }),
        )
        .await;
        assert_eq!(error_code(&resp), "VALIDATION_ERROR");

        let resp = run(&schema, UPDATE, json!({ "id": "not-an-id", "name": "Bea" })).await;
        assert_eq!(error_code(&resp), "VALIDATION_ERROR");

        let out = data(&schema, "{ getAllClients { clientName } }", json!({})).await;
        assert_eq!(out["getAllClients"], json!([{ "clientName": "Ana" }]));
    }

    #[tokio::test]
    async fn subscription_sees_each_mutation_in_order() {
        let (service, schema) = setup();
        let stream = schema.execute_stream(
            "subscription { onClientChange { eventType clientChanges { clientName cellPhones { number } } } }",
        );
        let collector = tokio::spawn(async move { stream.take(3).collect::<Vec<_>>().await });
        wait_for_subscribers(&service, 1).await;

        let created = create_ana(&schema).await;
        data(&schema, UPDATE, json!({ "id": created["id"], "name": "Bea" })).await;
        data(
            &schema,
            "mutation($id: ID!) { deleteOneClient(id: $id) { id } }",
            json!({ "id": created["id"] }),
        )
        .await;

        let responses = tokio::time::timeout(Duration::from_secs(5), collector)
            .await
            .unwrap()
            .unwrap();
        let events: Vec<Value> = responses
            .into_iter()
            .map(|r| r.data.into_json().unwrap()["onClientChange"].clone())
            .collect();

        assert_eq!(events[0]["eventType"], "CLIENT_ADDED");
        assert_eq!(events[0]["clientChanges"]["clientName"], "Ana");
        assert_eq!(events[0]["clientChanges"]["cellPhones"][0]["number"], "(555)123-4567");
        assert_eq!(events[1]["eventType"], "CLIENT_UPDATED");
        assert_eq!(events[1]["clientChanges"]["clientName"], "Bea");
        assert_eq!(events[2]["eventType"], "CLIENT_DELETED");
        assert_eq!(events[2]["clientChanges"]["clientName"], "Bea");
    }

    #[tokio::test]
    async fn subscription_after_hub_close_errors() {
        let (service, schema) = setup();
        service.hub().close();
        let mut stream = schema.execute_stream("subscription { onClientChange { eventType } }");
        let first = stream.next().await.unwrap();
        assert_eq!(error_code(&first), "INTERNAL_ERROR");
    }
}
