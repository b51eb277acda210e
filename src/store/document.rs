use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::store::{StoreError, StoreResult};

/// Slash-separated document or collection path, e.g.
/// `users/<id>/progress/<course>`. Documents sit at even depth, collections
/// at odd depth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath {
    segments: Vec<String>,
}

impl DocPath {
    pub fn root<S: Into<String>>(segment: S) -> Self {
        Self {
            segments: vec![segment.into()],
        }
    }

    pub fn child<S: Into<String>>(mut self, segment: S) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last_segment(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// The collection a document belongs to.
    pub fn parent(&self) -> Option<DocPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn is_child_of(&self, collection: &DocPath) -> bool {
        self.segments.len() == collection.segments.len() + 1
            && self.segments.starts_with(&collection.segments)
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    path: DocPath,
    data: Value,
    revision: u64,
}

impl Document {
    pub fn new(path: DocPath, data: Value, revision: u64) -> Self {
        Self {
            path,
            data,
            revision,
        }
    }

    pub fn path(&self) -> &DocPath {
        &self.path
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Document id, i.e. the last path segment parsed as a uuid.
    pub fn id(&self) -> StoreResult<Uuid> {
        Uuid::parse_str(self.path.last_segment())
            .map_err(|_| StoreError::MalformedId(self.path.clone()))
    }

    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        serde_json::from_value(self.data.clone()).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

/// One field-level mutation. Field names may be dotted to address nested
/// maps, e.g. `quizScores.<lessonId>`.
#[derive(Debug, Clone)]
pub enum FieldOp {
    Set(Value),
    Delete,
    ServerTimestamp,
    ArrayUnion(Vec<Value>),
    ArrayRemove(Vec<Value>),
}

/// An atomic multi-field patch. `merge` patches leave unmentioned fields
/// alone; replace patches rebuild the document from scratch.
#[derive(Debug, Clone)]
pub struct Patch {
    ops: BTreeMap<String, FieldOp>,
    merge: bool,
}

impl Patch {
    pub fn merge() -> Self {
        Self {
            ops: BTreeMap::new(),
            merge: true,
        }
    }

    pub fn replace() -> Self {
        Self {
            ops: BTreeMap::new(),
            merge: false,
        }
    }

    pub fn set<S: Into<String>>(mut self, field: S, value: Value) -> Self {
        self.ops.insert(field.into(), FieldOp::Set(value));
        self
    }

    pub fn delete<S: Into<String>>(mut self, field: S) -> Self {
        self.ops.insert(field.into(), FieldOp::Delete);
        self
    }

    pub fn server_timestamp<S: Into<String>>(mut self, field: S) -> Self {
        self.ops.insert(field.into(), FieldOp::ServerTimestamp);
        self
    }

    pub fn array_union<S: Into<String>>(mut self, field: S, values: Vec<Value>) -> Self {
        self.ops.insert(field.into(), FieldOp::ArrayUnion(values));
        self
    }

    pub fn array_remove<S: Into<String>>(mut self, field: S, values: Vec<Value>) -> Self {
        self.ops.insert(field.into(), FieldOp::ArrayRemove(values));
        self
    }

    pub fn ops(&self) -> impl Iterator<Item = (&str, &FieldOp)> {
        self.ops.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_merge(&self) -> bool {
        self.merge
    }
}

/// Write precondition, checked atomically with the patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Precondition {
    #[default]
    None,
    /// The document must not exist yet.
    NotExists,
    /// The document must still be at this revision.
    Revision(u64),
}

#[derive(Debug, Clone)]
pub struct CollectionSnapshot {
    path: DocPath,
    documents: Vec<Document>,
}

impl CollectionSnapshot {
    pub fn new(path: DocPath, documents: Vec<Document>) -> Self {
        Self { path, documents }
    }

    pub fn path(&self) -> &DocPath {
        &self.path
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, path: &DocPath) -> Option<&Document> {
        self.documents.iter().find(|d| d.path() == path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn path_parent_and_membership() {
        let collection = DocPath::root("users").child("u1").child("progress");
        let doc = collection.clone().child("c1");

        assert_eq!(doc.parent(), Some(collection.clone()));
        assert!(doc.is_child_of(&collection));
        assert!(!collection.is_child_of(&collection));
        assert_eq!(doc.to_string(), "users/u1/progress/c1");
    }
}
