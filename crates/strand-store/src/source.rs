use std::sync::Arc;

use strand_types::ObjectId;

use crate::error::StoreResult;
use crate::object::StoredObject;

/// Read access to content-addressed objects.
///
/// The diff machinery only ever reads: it walks stored trees through this
/// interface and never writes or deletes, so writing stays a concern of
/// each concrete backend. Implementations hand out shared payloads, which
/// keeps repeated walks over the same trees from copying bytes.
///
/// A source is keyed purely by id and must never substitute content: the
/// object returned for an id is the object whose digest is that id. An
/// unknown id is `Ok(None)`; errors mean the backend itself failed.
pub trait ObjectSource: Send + Sync {
    /// Fetch the object filed under `id`, or `None` if the id is unknown.
    fn fetch(&self, id: &ObjectId) -> StoreResult<Option<Arc<StoredObject>>>;

    /// Existence probe. Diff entry points use this to reject dangling
    /// roots before starting a walk; backends with a cheaper check than a
    /// full fetch should override it.
    fn contains(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.fetch(id)?.is_some())
    }
}
