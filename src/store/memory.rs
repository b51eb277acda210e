use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::store::{
    CollectionSnapshot, DocPath, Document, DocumentStore, FieldOp, Patch, Precondition, StoreError,
    StoreResult,
};

/// In-memory document store. Mirrors the hosted backend's semantics
/// (atomic field patches, revisions, collection snapshots) closely enough to
/// drive the whole engine in tests and concurrent-write simulations.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    documents: BTreeMap<DocPath, StoredDoc>,
    watchers: HashMap<DocPath, watch::Sender<CollectionSnapshot>>,
    broken_writes: HashSet<DocPath>,
}

#[derive(Debug)]
struct StoredDoc {
    data: Value,
    revision: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next write to `path` fail. Lets tests exercise the
    /// "previous confirmed state plus not-saved indication" behavior.
    pub fn inject_write_error(&self, path: &DocPath) {
        self.lock().broken_writes.insert(path.clone());
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(state: &State, collection: &DocPath) -> CollectionSnapshot {
        let documents = state
            .documents
            .iter()
            .filter(|(path, _)| path.is_child_of(collection))
            .map(|(path, doc)| Document::new(path.clone(), doc.data.clone(), doc.revision))
            .collect();
        CollectionSnapshot::new(collection.clone(), documents)
    }

    fn notify(state: &State, collection: &DocPath) {
        if let Some(tx) = state.watchers.get(collection) {
            tx.send_replace(Self::snapshot(state, collection));
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> StoreResult<Option<Document>> {
        let state = self.lock();
        Ok(state
            .documents
            .get(path)
            .map(|doc| Document::new(path.clone(), doc.data.clone(), doc.revision)))
    }

    async fn apply(
        &self,
        path: &DocPath,
        patch: Patch,
        precondition: Precondition,
    ) -> StoreResult<u64> {
        let mut state = self.lock();

        if state.broken_writes.remove(path) {
            return Err(StoreError::Backend(format!(
                "injected write failure for {path}"
            )));
        }

        let existing = state.documents.get(path);
        match precondition {
            Precondition::None => {}
            Precondition::NotExists => {
                if existing.is_some() {
                    return Err(StoreError::StaleWrite { path: path.clone() });
                }
            }
            Precondition::Revision(revision) => match existing {
                Some(doc) if doc.revision == revision => {}
                _ => return Err(StoreError::StaleWrite { path: path.clone() }),
            },
        }

        let mut data = match existing {
            Some(doc) if patch.is_merge() => doc.data.clone(),
            _ => Value::Object(Map::new()),
        };
        for (field, op) in patch.ops() {
            apply_op(&mut data, field, op);
        }

        let revision = existing.map(|doc| doc.revision + 1).unwrap_or(1);
        state.documents.insert(path.clone(), StoredDoc { data, revision });

        if let Some(collection) = path.parent() {
            Self::notify(&state, &collection);
        }
        Ok(revision)
    }

    async fn list(&self, collection: &DocPath) -> StoreResult<Vec<Document>> {
        let state = self.lock();
        Ok(Self::snapshot(&state, collection).documents().to_vec())
    }

    async fn watch(
        &self,
        collection: &DocPath,
    ) -> StoreResult<watch::Receiver<CollectionSnapshot>> {
        let mut state = self.lock();
        if let Some(tx) = state.watchers.get(collection) {
            return Ok(tx.subscribe());
        }
        let (tx, rx) = watch::channel(Self::snapshot(&state, collection));
        state.watchers.insert(collection.clone(), tx);
        Ok(rx)
    }
}

/// Applies one field op in place. Dotted field names address nested maps and
/// create intermediate objects as needed.
fn apply_op(data: &mut Value, field: &str, op: &FieldOp) {
    let (prefix, leaf) = match field.rsplit_once('.') {
        Some((prefix, leaf)) => (Some(prefix), leaf),
        None => (None, field),
    };

    let mut target = data;
    if let Some(prefix) = prefix {
        for segment in prefix.split('.') {
            target = object_mut(target)
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
    }
    let map = object_mut(target);

    match op {
        FieldOp::Set(value) => {
            map.insert(leaf.to_string(), value.clone());
        }
        FieldOp::Delete => {
            map.remove(leaf);
        }
        FieldOp::ServerTimestamp => {
            map.insert(leaf.to_string(), Value::String(Utc::now().to_rfc3339()));
        }
        FieldOp::ArrayUnion(values) => {
            let entry = map
                .entry(leaf.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if !entry.is_array() {
                *entry = Value::Array(Vec::new());
            }
            if let Value::Array(items) = entry {
                // union keeps the array duplicate-free
                for value in values {
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
            }
        }
        FieldOp::ArrayRemove(values) => {
            if let Some(Value::Array(items)) = map.get_mut(leaf) {
                items.retain(|item| !values.contains(item));
            }
        }
    }
}

fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn doc_path() -> DocPath {
        DocPath::root("users").child("u1").child("progress").child("c1")
    }

    #[tokio::test]
    async fn merge_patch_preserves_other_fields() {
        let store = MemoryStore::new();
        let path = doc_path();

        store
            .apply(
                &path,
                Patch::merge().set("a", json!(1)),
                Precondition::None,
            )
            .await
            .unwrap();
        store
            .apply(
                &path,
                Patch::merge().set("nested.b", json!(2)),
                Precondition::None,
            )
            .await
            .unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.data(), &json!({"a": 1, "nested": {"b": 2}}));
        assert_eq!(doc.revision(), 2);
    }

    #[tokio::test]
    async fn replace_patch_drops_other_fields() {
        let store = MemoryStore::new();
        let path = doc_path();

        store
            .apply(&path, Patch::merge().set("a", json!(1)), Precondition::None)
            .await
            .unwrap();
        store
            .apply(
                &path,
                Patch::replace().set("b", json!(2)),
                Precondition::None,
            )
            .await
            .unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.data(), &json!({"b": 2}));
    }

    #[tokio::test]
    async fn array_union_and_remove() {
        let store = MemoryStore::new();
        let path = doc_path();

        store
            .apply(
                &path,
                Patch::merge().array_union("items", vec![json!("x"), json!("y")]),
                Precondition::None,
            )
            .await
            .unwrap();
        store
            .apply(
                &path,
                Patch::merge().array_union("items", vec![json!("x"), json!("z")]),
                Precondition::None,
            )
            .await
            .unwrap();
        store
            .apply(
                &path,
                Patch::merge().array_remove("items", vec![json!("y")]),
                Precondition::None,
            )
            .await
            .unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.data(), &json!({"items": ["x", "z"]}));
    }

    #[tokio::test]
    async fn delete_removes_only_the_named_field() {
        let store = MemoryStore::new();
        let path = doc_path();

        store
            .apply(
                &path,
                Patch::merge().set("a", json!(1)).set("b", json!(2)),
                Precondition::None,
            )
            .await
            .unwrap();
        store
            .apply(&path, Patch::merge().delete("a"), Precondition::None)
            .await
            .unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.data(), &json!({"b": 2}));
    }

    #[tokio::test]
    async fn revision_precondition_rejects_stale_writers() {
        let store = MemoryStore::new();
        let path = doc_path();

        let rev = store
            .apply(&path, Patch::merge().set("a", json!(1)), Precondition::None)
            .await
            .unwrap();
        store
            .apply(
                &path,
                Patch::merge().set("a", json!(2)),
                Precondition::Revision(rev),
            )
            .await
            .unwrap();

        // the first writer's revision is no longer current
        let result = store
            .apply(
                &path,
                Patch::merge().set("a", json!(3)),
                Precondition::Revision(rev),
            )
            .await;
        assert!(matches!(result, Err(StoreError::StaleWrite { .. })));
    }

    #[tokio::test]
    async fn not_exists_precondition() {
        let store = MemoryStore::new();
        let path = doc_path();

        store
            .apply(&path, Patch::merge().set("a", json!(1)), Precondition::NotExists)
            .await
            .unwrap();
        let result = store
            .apply(&path, Patch::merge().set("a", json!(2)), Precondition::NotExists)
            .await;
        assert!(matches!(result, Err(StoreError::StaleWrite { .. })));
    }

    #[tokio::test]
    async fn watch_pushes_collection_snapshots() {
        let store = MemoryStore::new();
        let path = doc_path();
        let collection = path.parent().unwrap();

        let mut rx = store.watch(&collection).await.unwrap();
        assert!(rx.borrow().documents().is_empty());

        store
            .apply(&path, Patch::merge().set("a", json!(1)), Precondition::None)
            .await
            .unwrap();

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update();
        assert_eq!(snapshot.documents().len(), 1);
        assert_eq!(snapshot.document(&path).unwrap().data(), &json!({"a": 1}));
    }

    #[tokio::test]
    async fn injected_write_error_fires_once() {
        let store = MemoryStore::new();
        let path = doc_path();

        store.inject_write_error(&path);
        let result = store
            .apply(&path, Patch::merge().set("a", json!(1)), Precondition::None)
            .await;
        assert!(matches!(result, Err(StoreError::Backend(_))));

        store
            .apply(&path, Patch::merge().set("a", json!(1)), Precondition::None)
            .await
            .unwrap();
    }
}
