use async_graphql::{Context, Object, Result, Subscription, ID};
use tokio_stream::{Stream, StreamExt};

use clientline_service::{ClientEventKind, ClientService, ClientUpdate, EventFilter, NewClient, OptionalExt};

use super::objects::{
    parse_client_id, phone_numbers, phone_patches, to_gql_error, ClientChangeEvent, ClientNode,
    PhoneInput, PhoneUpdateInput,
};

fn service<'a>(ctx: &Context<'a>) -> Result<&'a ClientService> {
    ctx.data::<ClientService>()
}

#[derive(Default)]
pub struct ClientQuery;

#[Object]
impl ClientQuery {
    /// Every stored client, in creation order.
    async fn get_all_clients(&self, ctx: &Context<'_>) -> Result<Option<Vec<Option<ClientNode>>>> {
        let clients = service(ctx)?.list_clients().await.map_err(to_gql_error)?;
        Ok(Some(clients.into_iter().map(|c| Some(ClientNode(c))).collect()))
    }

    /// A single client, or null if the id is unknown.
    async fn get_one_client(&self, ctx: &Context<'_>, id: ID) -> Result<Option<ClientNode>> {
        let id = parse_client_id(&id).map_err(to_gql_error)?;
        let client = service(ctx)?
            .get_client(&id)
            .await
            .optional()
            .map_err(to_gql_error)?;
        Ok(client.map(ClientNode))
    }
}

#[derive(Default)]
pub struct ClientMutation;

#[Object]
impl ClientMutation {
    async fn create_one_client(
        &self,
        ctx: &Context<'_>,
        client_name: String,
        client_last_name: String,
        cell_phones: Vec<PhoneInput>,
    ) -> Result<Option<ClientNode>> {
        let phones = phone_numbers(cell_phones).map_err(|e| to_gql_error(e.into()))?;
        let client = service(ctx)?
            .create_client(NewClient::new(client_name, client_last_name, phones))
            .await
            .map_err(to_gql_error)?;
        Ok(Some(ClientNode(client)))
    }

    /// Change names and/or the phone list. Omitted arguments are left
    /// untouched. Returns null if the id is unknown.
    async fn update_one_client(
        &self,
        ctx: &Context<'_>,
        id: ID,
        client_name: Option<String>,
        client_last_name: Option<String>,
        cell_phones: Option<Vec<PhoneUpdateInput>>,
    ) -> Result<Option<ClientNode>> {
        let id = parse_client_id(&id).map_err(to_gql_error)?;
        let update = ClientUpdate {
            client_name,
            client_last_name,
            cell_phones: phone_patches(cell_phones.unwrap_or_default())
                .map_err(|e| to_gql_error(e.into()))?,
        };
        let client = service(ctx)?
            .update_client(&id, update)
            .await
            .optional()
            .map_err(to_gql_error)?;
        Ok(client.map(ClientNode))
    }

    /// Remove a client and return its last state, or null if the id is
    /// unknown.
    async fn delete_one_client(&self, ctx: &Context<'_>, id: ID) -> Result<Option<ClientNode>> {
        let id = parse_client_id(&id).map_err(to_gql_error)?;
        let client = service(ctx)?
            .delete_client(&id)
            .await
            .optional()
            .map_err(to_gql_error)?;
        Ok(client.map(ClientNode))
    }
}

#[derive(Default)]
pub struct ClientSubscription;

#[Subscription]
impl ClientSubscription {
    /// Change events published after the subscription opens.
    async fn on_client_change(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = ClientChangeEvent>> {
        let stream = service(ctx)?
            .subscribe(EventFilter::channels(ClientEventKind::ALL))
            .map_err(to_gql_error)?;
        Ok(stream.map(ClientChangeEvent::from))
    }
}
