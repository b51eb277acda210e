use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::{Mutex, OwnedMutexGuard, watch};
use uuid::Uuid;

use crate::model::{ProgressRecord, QuizScore};
use crate::store::{
    CollectionSnapshot, DocumentStore, Patch, Precondition, StoreError, StoreResult, paths,
};

/// Typed adapter for progress documents. All mutations of one (learner,
/// course) record go through a shared per-key lock, so in-flight writes are
/// queued, never dropped; cross-client races are handled with atomic field
/// patches and revision preconditions.
#[derive(Clone)]
pub struct ProgressStore {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn DocumentStore>,
    write_locks: Mutex<HashMap<(Uuid, Uuid), Arc<Mutex<()>>>>,
    stale_write_retries: u32,
}

impl ProgressStore {
    pub fn new(store: Arc<dyn DocumentStore>, stale_write_retries: u32) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                write_locks: Mutex::new(HashMap::new()),
                stale_write_retries,
            }),
        }
    }

    async fn write_lock(&self, learner_id: Uuid, course_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.write_locks.lock().await;
            locks.entry((learner_id, course_id)).or_default().clone()
        };
        // later writers queue here in arrival order
        lock.lock_owned().await
    }

    pub async fn load(
        &self,
        learner_id: Uuid,
        course_id: Uuid,
    ) -> StoreResult<Option<ProgressRecord>> {
        match self
            .inner
            .store
            .get(&paths::progress(learner_id, course_id))
            .await?
        {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    async fn load_or_default(
        &self,
        learner_id: Uuid,
        course_id: Uuid,
    ) -> StoreResult<ProgressRecord> {
        Ok(self.load(learner_id, course_id).await?.unwrap_or_default())
    }

    /// Creates the record on first open and stamps `startedAt` exactly once;
    /// later opens never move it.
    pub async fn ensure_started(
        &self,
        learner_id: Uuid,
        course_id: Uuid,
    ) -> StoreResult<ProgressRecord> {
        let _guard = self.write_lock(learner_id, course_id).await;
        let path = paths::progress(learner_id, course_id);

        let mut attempts = 0;
        loop {
            let existing = self.inner.store.get(&path).await?;
            let (started, precondition) = match &existing {
                Some(doc) => (
                    doc.decode::<ProgressRecord>()?.started_at().is_some(),
                    Precondition::Revision(doc.revision()),
                ),
                None => (false, Precondition::NotExists),
            };
            if started {
                break;
            }

            let patch = Patch::merge().server_timestamp("startedAt");
            match self.inner.store.apply(&path, patch, precondition).await {
                Ok(_) => break,
                Err(StoreError::StaleWrite { .. })
                    if attempts < self.inner.stale_write_retries =>
                {
                    // someone else created the record first; re-check it
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }

        self.load_or_default(learner_id, course_id).await
    }

    /// Moves the "continue learning" pointer. Repeated opens of the same
    /// lesson are idempotent except for the timestamp.
    pub async fn record_opened(
        &self,
        learner_id: Uuid,
        course_id: Uuid,
        lesson_id: Uuid,
    ) -> StoreResult<ProgressRecord> {
        let _guard = self.write_lock(learner_id, course_id).await;
        let patch = Patch::merge()
            .set("lastOpenedLessonId", json!(lesson_id))
            .server_timestamp("lastOpenedAt");
        self.inner
            .store
            .apply(&paths::progress(learner_id, course_id), patch, Precondition::None)
            .await?;
        self.load_or_default(learner_id, course_id).await
    }

    /// One-way completion used right after a quiz submission. Array-union
    /// makes duplicates impossible without a read.
    pub async fn mark_complete(
        &self,
        learner_id: Uuid,
        course_id: Uuid,
        lesson_id: Uuid,
    ) -> StoreResult<ProgressRecord> {
        let _guard = self.write_lock(learner_id, course_id).await;
        let patch = Patch::merge().array_union("completedLessons", vec![json!(lesson_id)]);
        self.inner
            .store
            .apply(&paths::progress(learner_id, course_id), patch, Precondition::None)
            .await?;
        self.load_or_default(learner_id, course_id).await
    }

    /// Flips completion for one lesson. The add/remove decision is made
    /// against the current persisted record and guarded by its revision;
    /// a conflicting writer forces a re-read, never a blind overwrite.
    pub async fn toggle_completion(
        &self,
        learner_id: Uuid,
        course_id: Uuid,
        lesson_id: Uuid,
    ) -> StoreResult<ProgressRecord> {
        let _guard = self.write_lock(learner_id, course_id).await;
        let path = paths::progress(learner_id, course_id);

        let mut attempts = 0;
        loop {
            let existing = self.inner.store.get(&path).await?;
            let (record, precondition) = match &existing {
                Some(doc) => (
                    doc.decode::<ProgressRecord>()?,
                    Precondition::Revision(doc.revision()),
                ),
                None => (ProgressRecord::default(), Precondition::NotExists),
            };

            let patch = if record.is_completed(lesson_id) {
                Patch::merge().array_remove("completedLessons", vec![json!(lesson_id)])
            } else {
                Patch::merge().array_union("completedLessons", vec![json!(lesson_id)])
            };
            // the toggle doubles as a navigation event
            let patch = patch
                .set("lastOpenedLessonId", json!(lesson_id))
                .server_timestamp("lastOpenedAt");

            match self.inner.store.apply(&path, patch, precondition).await {
                Ok(_) => break,
                Err(StoreError::StaleWrite { .. })
                    if attempts < self.inner.stale_write_retries =>
                {
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }

        self.load_or_default(learner_id, course_id).await
    }

    /// Writes the score for one lesson, preserving every other lesson's
    /// entry. Resubmission overwrites; no history is kept.
    pub async fn merge_quiz_score(
        &self,
        learner_id: Uuid,
        course_id: Uuid,
        lesson_id: Uuid,
        score: QuizScore,
    ) -> StoreResult<ProgressRecord> {
        let _guard = self.write_lock(learner_id, course_id).await;
        let patch = Patch::merge().set(format!("quizScores.{lesson_id}"), json!(score));
        self.inner
            .store
            .apply(&paths::progress(learner_id, course_id), patch, Precondition::None)
            .await?;
        self.load_or_default(learner_id, course_id).await
    }

    /// Change notifications for all of one learner's progress documents.
    pub async fn watch_learner(
        &self,
        learner_id: Uuid,
    ) -> StoreResult<watch::Receiver<CollectionSnapshot>> {
        self.inner
            .store
            .watch(&paths::learner_progress(learner_id))
            .await
    }
}
