use shelf_types::{OwnerId, Record, RecordId};

/// Owner-scoped CRUD over one record kind.
///
/// All implementations must satisfy these invariants:
/// - `create` assigns an id strictly greater than every id handed out before.
/// - `update` merges only the supplied fields, leaves `id` and `created_at`
///   untouched and always refreshes `updated_at`.
/// - Once deleted, a record can be neither read nor updated again.
/// - A record owned by someone else behaves exactly like a missing one.
/// - Every operation runs to completion before the next one starts.
pub trait RecordStore<K: Record>: Send + Sync {
    /// All of `owner`'s records, in insertion order.
    fn list_all(&self, owner: &OwnerId) -> Vec<K>;

    /// Look up one record. Returns `None` if absent or not owned by `owner`.
    fn get_by_id(&self, owner: &OwnerId, id: RecordId) -> Option<K>;

    /// Store a new record and return it with its assigned id and timestamps.
    fn create(&self, owner: &OwnerId, draft: K::Draft) -> K;

    /// Merge `patch` into an existing record. Returns `None` if not found.
    fn update(&self, owner: &OwnerId, id: RecordId, patch: K::Patch) -> Option<K>;

    /// Remove a record. Returns `true` if a removal occurred.
    fn delete(&self, owner: &OwnerId, id: RecordId) -> bool;

    /// Aggregate over `owner`'s current records.
    fn stats(&self, owner: &OwnerId) -> K::Stats;

    /// Number of records visible to `owner`.
    ///
    /// Default implementation materializes `list_all`. Backends may
    /// override to count without cloning.
    fn count(&self, owner: &OwnerId) -> usize {
        self.list_all(owner).len()
    }
}
