use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shelf_types::{Clock, MonotonicClock, OwnerId, Record, RecordId, SystemClock};

use crate::traits::RecordStore;

struct Entry<K> {
    owner: OwnerId,
    record: K,
}

struct State<K> {
    entries: Vec<Entry<K>>,
    next_id: RecordId,
}

impl<K: Record> State<K> {
    fn position(&self, owner: &OwnerId, id: RecordId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.record.id() == id && e.owner == *owner)
    }

    fn owned_by<'a>(&'a self, owner: &'a OwnerId) -> impl Iterator<Item = &'a K> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.owner == *owner)
            .map(|e| &e.record)
    }
}

/// In-memory, `Vec`-backed record store.
///
/// Records and the id counter live behind one `RwLock`, so each operation
/// (including the read-modify-write of `update`) is atomic with respect to
/// the others. Records are cloned on the way out; callers never hold
/// references into the store across requests.
pub struct InMemoryRecordStore<K: Record> {
    state: RwLock<State<K>>,
    clock: MonotonicClock<Box<dyn Clock>>,
}

impl<K: Record> InMemoryRecordStore<K> {
    /// Create a new empty store. The first id handed out is 1.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create an empty store that stamps records from `clock`.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        let source: Box<dyn Clock> = Box::new(clock);
        Self {
            state: RwLock::new(State {
                entries: Vec::new(),
                next_id: RecordId::new(1),
            }),
            clock: MonotonicClock::with_source(source),
        }
    }

    /// Create a store pre-populated with `seed`, all owned by `owner`.
    ///
    /// Seeded records get ids `1..=n`, so the counter resumes at `n + 1`.
    pub fn with_seed(owner: &OwnerId, seed: impl IntoIterator<Item = K::Draft>) -> Self {
        let store = Self::new();
        for draft in seed {
            store.create(owner, draft);
        }
        store
    }

    /// Total number of records across all owners.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    /// Returns `true` if no owner has any records.
    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// The id the next `create` will assign.
    pub fn next_id(&self) -> RecordId {
        self.read().next_id
    }

    fn read(&self) -> RwLockReadGuard<'_, State<K>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State<K>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Record> Default for InMemoryRecordStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Record> RecordStore<K> for InMemoryRecordStore<K> {
    fn list_all(&self, owner: &OwnerId) -> Vec<K> {
        self.read().owned_by(owner).cloned().collect()
    }

    fn get_by_id(&self, owner: &OwnerId, id: RecordId) -> Option<K> {
        let state = self.read();
        state
            .position(owner, id)
            .map(|idx| state.entries[idx].record.clone())
    }

    fn create(&self, owner: &OwnerId, draft: K::Draft) -> K {
        let mut state = self.write();
        let id = state.next_id;
        state.next_id = id.next();
        let record = K::from_draft(id, draft, self.clock.stamp());
        state.entries.push(Entry {
            owner: owner.clone(),
            record: record.clone(),
        });
        tracing::debug!(kind = K::KIND, %id, %owner, "record created");
        record
    }

    fn update(&self, owner: &OwnerId, id: RecordId, patch: K::Patch) -> Option<K> {
        let mut state = self.write();
        let idx = state.position(owner, id)?;
        let now = self.clock.stamp();
        let record = &mut state.entries[idx].record;
        record.apply_patch(patch, now);
        tracing::debug!(kind = K::KIND, %id, %owner, "record updated");
        Some(record.clone())
    }

    fn delete(&self, owner: &OwnerId, id: RecordId) -> bool {
        let mut state = self.write();
        match state.position(owner, id) {
            Some(idx) => {
                state.entries.remove(idx);
                tracing::debug!(kind = K::KIND, %id, %owner, "record deleted");
                true
            }
            None => false,
        }
    }

    fn stats(&self, owner: &OwnerId) -> K::Stats {
        K::summarize(self.read().owned_by(owner))
    }

    fn count(&self, owner: &OwnerId) -> usize {
        self.read().owned_by(owner).count()
    }
}

impl<K: Record> std::fmt::Debug for InMemoryRecordStore<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("InMemoryRecordStore")
            .field("kind", &K::KIND)
            .field("record_count", &state.entries.len())
            .field("next_id", &state.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use shelf_types::{
        Book, BookPatch, BookStatus, FixedClock, NewBook, NewTask, Patch, Task, TaskPatch,
    };

    fn alice() -> OwnerId {
        OwnerId::new("alice")
    }

    fn bob() -> OwnerId {
        OwnerId::new("bob")
    }

    fn draft(title: &str) -> NewBook {
        NewBook::new(title, "Author", 2001, "Essay", 120, BookStatus::Unread)
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn create_then_get_returns_equal_record() {
        let store = InMemoryRecordStore::<Book>::new();
        let created = store.create(&alice(), draft("Dune"));
        let fetched = store.get_by_id(&alice(), created.id).expect("should exist");
        assert_eq!(fetched, created);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let store = InMemoryRecordStore::<Task>::new();
        let a = store.create(&alice(), NewTask::new("a"));
        let b = store.create(&alice(), NewTask::new("b"));
        assert_eq!(a.id, RecordId::new(1));
        assert_eq!(b.id, RecordId::new(2));
        assert_eq!(store.next_id(), RecordId::new(3));
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = InMemoryRecordStore::<Book>::new();
        for title in ["c", "a", "b"] {
            store.create(&alice(), draft(title));
        }
        let titles: Vec<_> = store
            .list_all(&alice())
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }

    #[test]
    fn missing_id_is_absent_not_error() {
        let store = InMemoryRecordStore::<Book>::new();
        assert!(store.get_by_id(&alice(), RecordId::new(999)).is_none());
        assert!(store
            .update(&alice(), RecordId::new(999), BookPatch::default())
            .is_none());
        assert!(!store.delete(&alice(), RecordId::new(999)));
    }

    #[test]
    fn update_merges_supplied_fields() {
        let store = InMemoryRecordStore::<Book>::new();
        let created = store.create(&alice(), draft("Dune"));
        let updated = store
            .update(
                &alice(),
                created.id,
                BookPatch {
                    status: Patch::Value(BookStatus::Completed),
                    rating: Patch::Value(5),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, BookStatus::Completed);
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.title, "Dune");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(store.get_by_id(&alice(), created.id).unwrap(), updated);
    }

    #[test]
    fn empty_patch_only_refreshes_updated_at() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let store = InMemoryRecordStore::<Task>::with_clock(FixedClock(instant));
        let created = store.create(&alice(), NewTask::new("Buy milk"));
        let updated = store
            .update(&alice(), created.id, TaskPatch::default())
            .unwrap();
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(
            Task {
                updated_at: created.updated_at,
                ..updated
            },
            created
        );
    }

    #[test]
    fn delete_is_final() {
        let store = InMemoryRecordStore::<Book>::new();
        let created = store.create(&alice(), draft("Dune"));
        assert!(store.delete(&alice(), created.id));
        assert!(store.get_by_id(&alice(), created.id).is_none());
        assert!(store
            .update(&alice(), created.id, BookPatch::default())
            .is_none());
        assert!(!store.delete(&alice(), created.id));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = InMemoryRecordStore::<Task>::new();
        let a = store.create(&alice(), NewTask::new("a"));
        store.delete(&alice(), a.id);
        let b = store.create(&alice(), NewTask::new("b"));
        assert!(b.id > a.id);
    }

    // -----------------------------------------------------------------------
    // Owner scoping
    // -----------------------------------------------------------------------

    #[test]
    fn records_are_invisible_to_other_owners() {
        let store = InMemoryRecordStore::<Task>::new();
        let a = store.create(&alice(), NewTask::new("mine"));
        assert!(store.get_by_id(&bob(), a.id).is_none());
        assert!(store.list_all(&bob()).is_empty());
        assert!(store.update(&bob(), a.id, TaskPatch::completed(true)).is_none());
        assert!(!store.delete(&bob(), a.id));
        assert!(!store.get_by_id(&alice(), a.id).unwrap().completed);
    }

    #[test]
    fn ids_are_shared_across_owners() {
        let store = InMemoryRecordStore::<Task>::new();
        let a = store.create(&alice(), NewTask::new("a"));
        let b = store.create(&bob(), NewTask::new("b"));
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
        assert_eq!(store.count(&alice()), 1);
    }

    #[test]
    fn stats_are_per_owner() {
        let store = InMemoryRecordStore::<Task>::new();
        let a = store.create(&alice(), NewTask::new("a"));
        store.create(&alice(), NewTask::new("b"));
        store.create(&bob(), NewTask::new("c"));
        store.update(&alice(), a.id, TaskPatch::completed(true));

        let stats = store.stats(&alice());
        assert_eq!((stats.total, stats.completed, stats.pending), (2, 1, 1));
        assert_eq!(store.stats(&bob()).total, 1);
    }

    // -----------------------------------------------------------------------
    // Seeding
    // -----------------------------------------------------------------------

    #[test]
    fn seeded_counter_resumes_after_seed() {
        let seed = vec![draft("a"), draft("b"), draft("c")];
        let store = InMemoryRecordStore::<Book>::with_seed(&OwnerId::anonymous(), seed);
        assert_eq!(store.len(), 3);
        assert_eq!(store.next_id(), RecordId::new(4));
        let created = store.create(&OwnerId::anonymous(), draft("d"));
        assert_eq!(created.id, RecordId::new(4));
    }

    #[test]
    fn debug_output() {
        let store = InMemoryRecordStore::<Book>::new();
        let dbg = format!("{store:?}");
        assert!(dbg.contains("InMemoryRecordStore"));
        assert!(dbg.contains("book"));
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    #[derive(Clone, Debug)]
    enum Op {
        Create(bool),
        Toggle(u64),
        Delete(u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<bool>().prop_map(Op::Create),
            (1u64..20).prop_map(Op::Toggle),
            (1u64..20).prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn ids_strictly_increase(ops in proptest::collection::vec(op(), 0..60)) {
            let store = InMemoryRecordStore::<Task>::new();
            let owner = alice();
            let mut max_seen = 0u64;
            for op in ops {
                match op {
                    Op::Create(_) => {
                        let t = store.create(&owner, NewTask::new("t"));
                        prop_assert!(t.id.get() > max_seen);
                        max_seen = t.id.get();
                    }
                    Op::Toggle(id) => {
                        store.update(&owner, RecordId::new(id), TaskPatch::completed(true));
                    }
                    Op::Delete(id) => {
                        store.delete(&owner, RecordId::new(id));
                    }
                }
            }
        }

        #[test]
        fn stats_total_matches_list(ops in proptest::collection::vec(op(), 0..60)) {
            let store = InMemoryRecordStore::<Task>::new();
            let owner = alice();
            for op in ops {
                match op {
                    Op::Create(other) => {
                        let who = if other { bob() } else { alice() };
                        store.create(&who, NewTask::new("t"));
                    }
                    Op::Toggle(id) => {
                        store.update(&owner, RecordId::new(id), TaskPatch::completed(true));
                    }
                    Op::Delete(id) => {
                        store.delete(&owner, RecordId::new(id));
                    }
                }
                let stats = store.stats(&owner);
                let listed = store.list_all(&owner);
                prop_assert_eq!(stats.total, listed.len());
                prop_assert_eq!(stats.completed, listed.iter().filter(|t| t.completed).count());
                prop_assert_eq!(stats.completed + stats.pending, stats.total);
            }
        }
    }
}
