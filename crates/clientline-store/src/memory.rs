use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use clientline_types::{Client, ClientId, ClientUpdate, NewClient};

use crate::error::{StoreError, StoreResult};
use crate::traits::ClientStore;

/// In-memory, map-based client store.
///
/// Intended for tests, demos and single-process deployments. Documents are
/// held behind a `RwLock`; every mutation runs inside one write section, so
/// concurrent writers to the same id are serialized and readers never see a
/// half-applied patch. Ids are time-ordered, so the natural scan order is
/// creation order.
pub struct InMemoryClientStore {
    clients: RwLock<BTreeMap<ClientId, Client>>,
}

impl InMemoryClientStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.clients.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryClientStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Internal(format!("lock poisoned: {e}"))
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn insert(&self, new_client: NewClient) -> StoreResult<Client> {
        let client = new_client.into_client(ClientId::generate(), Utc::now());
        client.validate()?;

        let mut map = self.clients.write().map_err(poisoned)?;
        map.insert(client.id, client.clone());
        debug!(id = %client.id, "document inserted");
        Ok(client)
    }

    async fn find_by_id(&self, id: &ClientId) -> StoreResult<Option<Client>> {
        let map = self.clients.read().map_err(poisoned)?;
        Ok(map.get(id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Client>> {
        let map = self.clients.read().map_err(poisoned)?;
        Ok(map.values().cloned().collect())
    }

    async fn apply_patch(
        &self,
        id: &ClientId,
        update: &ClientUpdate,
    ) -> StoreResult<Option<Client>> {
        let mut map = self.clients.write().map_err(poisoned)?;
        let Some(current) = map.get(id) else {
            return Ok(None);
        };

        // Patch a copy so a validation failure leaves the stored document
        // untouched.
        let mut patched = current.clone();
        let matched = update.apply_to(&mut patched, Utc::now());
        patched.validate()?;

        map.insert(*id, patched.clone());
        debug!(
            id = %id,
            patches = update.cell_phones.len(),
            matched,
            "document patched"
        );
        Ok(Some(patched))
    }

    async fn delete_by_id(&self, id: &ClientId) -> StoreResult<Option<Client>> {
        let mut map = self.clients.write().map_err(poisoned)?;
        Ok(map.remove(id))
    }

    async fn count(&self) -> StoreResult<usize> {
        let map = self.clients.read().map_err(poisoned)?;
        Ok(map.len())
    }
}

impl std::fmt::Debug for InMemoryClientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryClientStore")
            .field("client_count", &self.len())
            .finish()
    }
}
