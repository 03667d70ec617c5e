use async_trait::async_trait;

use clientline_types::{Client, ClientId, ClientUpdate, NewClient};

use crate::error::StoreResult;

/// Storage port for client documents.
///
/// All implementations must satisfy these invariants:
/// - The store assigns identifiers; they are unique for the lifetime of the
///   store.
/// - Every write validates the resulting document and is all-or-nothing:
///   a rejected write leaves the stored document untouched.
/// - Concurrent writes to the same id are serialized by the store.
/// - All backend errors are propagated, never silently ignored.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a new document, assigning its id and timestamps and a number
    /// id to every phone.
    async fn insert(&self, new_client: NewClient) -> StoreResult<Client>;

    /// Read a document by id.
    ///
    /// Returns `Ok(None)` if no document has that id.
    async fn find_by_id(&self, id: &ClientId) -> StoreResult<Option<Client>>;

    /// Read every document in the store's natural order.
    async fn find_all(&self) -> StoreResult<Vec<Client>>;

    /// Apply all phone patches of `update`, then its field changes and the
    /// `updatedAt` refresh, as one atomic write.
    ///
    /// Returns the post-update document, or `Ok(None)` if the id is unknown
    /// (in which case nothing is written).
    async fn apply_patch(&self, id: &ClientId, update: &ClientUpdate)
        -> StoreResult<Option<Client>>;

    /// Remove a document and return its last state.
    ///
    /// Returns `Ok(None)` if the id is unknown.
    async fn delete_by_id(&self, id: &ClientId) -> StoreResult<Option<Client>>;

    /// Number of stored documents.
    ///
    /// Default implementation scans with `find_all()`. Backends may
    /// override with a cheaper count.
    async fn count(&self) -> StoreResult<usize> {
        Ok(self.find_all().await?.len())
    }
}
