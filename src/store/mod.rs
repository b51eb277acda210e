//! Document-store boundary. Everything the engine persists or reads goes
//! through the [`DocumentStore`] trait; the hosted backend is external and
//! [`MemoryStore`] mirrors its semantics for tests and simulations.

mod catalog;
pub use catalog::CourseCatalog;

mod document;
pub use document::{CollectionSnapshot, DocPath, Document, FieldOp, Patch, Precondition};

mod error;
pub use error::{StoreError, StoreResult};

mod memory;
pub use memory::MemoryStore;

mod progress;
pub use progress::ProgressStore;

use async_trait::async_trait;
use tokio::sync::watch;

#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    async fn get(&self, path: &DocPath) -> StoreResult<Option<Document>>;

    /// Applies a field-level patch atomically and returns the new revision.
    async fn apply(
        &self,
        path: &DocPath,
        patch: Patch,
        precondition: Precondition,
    ) -> StoreResult<u64>;

    async fn list(&self, collection: &DocPath) -> StoreResult<Vec<Document>>;

    /// Change notifications for a collection; the receiver always holds the
    /// latest snapshot.
    async fn watch(&self, collection: &DocPath) -> StoreResult<watch::Receiver<CollectionSnapshot>>;
}

/// Document paths used by the engine, in one place.
pub mod paths {
    use super::DocPath;
    use uuid::Uuid;

    pub fn courses() -> DocPath {
        DocPath::root("courses")
    }

    pub fn course(course_id: Uuid) -> DocPath {
        courses().child(course_id.to_string())
    }

    pub fn lessons(course_id: Uuid) -> DocPath {
        course(course_id).child("lessons")
    }

    pub fn lesson(course_id: Uuid, lesson_id: Uuid) -> DocPath {
        lessons(course_id).child(lesson_id.to_string())
    }

    pub fn quizzes(course_id: Uuid, lesson_id: Uuid) -> DocPath {
        lesson(course_id, lesson_id).child("quizzes")
    }

    pub fn quiz(course_id: Uuid, lesson_id: Uuid, quiz_id: Uuid) -> DocPath {
        quizzes(course_id, lesson_id).child(quiz_id.to_string())
    }

    pub fn learner_progress(learner_id: Uuid) -> DocPath {
        DocPath::root("users")
            .child(learner_id.to_string())
            .child("progress")
    }

    pub fn progress(learner_id: Uuid, course_id: Uuid) -> DocPath {
        learner_progress(learner_id).child(course_id.to_string())
    }
}
