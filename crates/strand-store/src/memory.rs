use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use strand_types::ObjectId;

use crate::error::StoreResult;
use crate::object::StoredObject;
use crate::source::ObjectSource;

/// Object storage held entirely in memory.
///
/// Backs tests and small embedded repositories. Payloads are shared out
/// as `Arc`s, so fetching an object never copies its bytes no matter how
/// many walks hold it.
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<ObjectId, Arc<StoredObject>>>,
}

// A poisoned lock only means some other thread panicked mid-access; the
// map itself is never left half-written, so recover the guard rather
// than propagating the panic.
fn read_side<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_side<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// File an object under its content-derived id and return that id.
    ///
    /// Inserting identical content twice keeps the first copy: the id
    /// fully determines the payload, so there is nothing to replace.
    pub fn insert(&self, object: StoredObject) -> ObjectId {
        let id = object.id();
        write_side(&self.objects)
            .entry(id)
            .or_insert_with(|| Arc::new(object));
        id
    }

    /// Number of distinct objects held.
    pub fn len(&self) -> usize {
        read_side(&self.objects).len()
    }

    /// Returns `true` if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        read_side(&self.objects).is_empty()
    }
}

impl ObjectSource for MemoryStore {
    fn fetch(&self, id: &ObjectId) -> StoreResult<Option<Arc<StoredObject>>> {
        Ok(read_side(&self.objects).get(id).cloned())
    }

    fn contains(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(read_side(&self.objects).contains_key(id))
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("objects", &self.len())
            .finish()
    }
}
