use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use clientline_events::{ClientEventKind, ClientEventStream, EventFilter, EventHub, HubConfig};
use clientline_store::{ClientStore, InMemoryClientStore};
use clientline_types::{Client, ClientId, ClientUpdate, NewClient};

use crate::error::{ServiceError, ServiceResult};

/// Mutation and query handlers for client documents.
///
/// Every successful mutation publishes exactly one event on the hub,
/// carrying the same document the caller gets back. Publishing happens
/// after the store write and never waits on subscribers.
///
/// Mutations hold `write_order` across the store write and the publish, so
/// events leave the hub in commit order and the last event seen for an id
/// always matches what the store holds.
#[derive(Clone)]
pub struct ClientService {
    store: Arc<dyn ClientStore>,
    hub: Arc<EventHub>,
    write_order: Arc<Mutex<()>>,
}

impl ClientService {
    pub fn new(store: Arc<dyn ClientStore>, hub: Arc<EventHub>) -> Self {
        Self {
            store,
            hub,
            write_order: Arc::new(Mutex::new(())),
        }
    }

    /// A service over a fresh in-memory store and hub.
    pub fn in_memory(hub_config: HubConfig) -> Self {
        Self::new(
            Arc::new(InMemoryClientStore::new()),
            Arc::new(EventHub::new(hub_config)),
        )
    }

    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }

    // ---- Mutations ----

    /// Create a client. Publishes `CLIENT_ADDED`.
    pub async fn create_client(&self, input: NewClient) -> ServiceResult<Client> {
        let _order = self.write_order.lock().await;
        let client = self.store.insert(input).await?;
        info!(id = %client.id, phones = client.cell_phones.len(), "client created");
        self.hub.publish(ClientEventKind::ClientAdded, client.clone());
        Ok(client)
    }

    /// Update a client's fields and/or phone list. Publishes
    /// `CLIENT_UPDATED`.
    ///
    /// Store failures are returned to the caller, including failures of the
    /// final field/timestamp write.
    pub async fn update_client(&self, id: &ClientId, update: ClientUpdate) -> ServiceResult<Client> {
        let _order = self.write_order.lock().await;
        let Some(client) = self.store.apply_patch(id, &update).await? else {
            warn!(id = %id, "update for unknown client");
            return Err(ServiceError::NotFound(*id));
        };
        info!(
            id = %client.id,
            phone_patches = update.cell_phones.len(),
            phones = client.cell_phones.len(),
            "client updated"
        );
        self.hub.publish(ClientEventKind::ClientUpdated, client.clone());
        Ok(client)
    }

    /// Delete a client. Publishes `CLIENT_DELETED` with its last state.
    pub async fn delete_client(&self, id: &ClientId) -> ServiceResult<Client> {
        let _order = self.write_order.lock().await;
        let Some(client) = self.store.delete_by_id(id).await? else {
            warn!(id = %id, "delete for unknown client");
            return Err(ServiceError::NotFound(*id));
        };
        info!(id = %client.id, "client deleted");
        self.hub.publish(ClientEventKind::ClientDeleted, client.clone());
        Ok(client)
    }

    // ---- Queries ----

    pub async fn list_clients(&self) -> ServiceResult<Vec<Client>> {
        let clients = self.store.find_all().await?;
        debug!(count = clients.len(), "clients listed");
        Ok(clients)
    }

    pub async fn get_client(&self, id: &ClientId) -> ServiceResult<Client> {
        let client = self.store.find_by_id(id).await?;
        debug!(id = %id, found = client.is_some(), "client fetched");
        client.ok_or(ServiceError::NotFound(*id))
    }

    // ---- Subscriptions ----

    /// Open a change stream on the channels selected by `filter`.
    pub fn subscribe(&self, filter: EventFilter) -> ServiceResult<ClientEventStream> {
        Ok(self.hub.subscribe(filter)?)
    }
}

impl std::fmt::Debug for ClientService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientService")
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}
