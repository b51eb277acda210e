//! The single owned projection of one learner's progress through one
//! course. Every UI view subscribes to this projection instead of
//! re-deriving progress on its own, and every mutation goes through here so
//! gating is checked before anything is persisted.

mod error;
pub use error::{SessionError, SessionResult};

mod view;
pub use view::{LessonView, ProgressView, SaveState};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

use crate::certificate::Certificate;
use crate::config::Config;
use crate::engine::{self, PlayerEvent, VideoGate};
use crate::error::{EngineResult, log_error};
use crate::model::{CourseOutline, LearnerIdentity, Lesson, ProgressRecord, QuizScore};
use crate::store::{
    CollectionSnapshot, CourseCatalog, DocumentStore, ProgressStore, StoreError, paths,
};

pub struct CourseSession {
    learner: LearnerIdentity,
    outline: CourseOutline,
    catalog: CourseCatalog,
    progress_store: ProgressStore,
    // last state the store confirmed; failed writes never touch it
    progress: ProgressRecord,
    selected: Option<Uuid>,
    gate: VideoGate,
    save_state: SaveState,
    view_tx: watch::Sender<ProgressView>,
}

impl CourseSession {
    /// Loads the outline and the learner's progress record, creating the
    /// record (with `startedAt` stamped once) on first open. A course that
    /// no longer exists opens as a session without content.
    #[tracing::instrument(skip(store))]
    pub async fn open(
        store: Arc<dyn DocumentStore>,
        learner: LearnerIdentity,
        course_id: Uuid,
    ) -> EngineResult<Self> {
        let config = Config::get_or_init(cfg!(debug_assertions)).await;
        let catalog = CourseCatalog::new(store.clone());
        let progress_store = ProgressStore::new(store, config.engine().stale_write_retries());

        let outline = catalog.course_outline(course_id).await?;
        let progress = progress_store
            .ensure_started(learner.id(), course_id)
            .await?;

        let selected = engine::resume_lesson(&outline, &progress).map(Lesson::id);
        let mut gate = VideoGate::new();
        if let Some(lesson) = selected.and_then(|id| outline.lesson_by_id(id)) {
            gate.select_lesson(lesson);
        }

        let view = view::project(&outline, &progress, selected, &gate, SaveState::Saved);
        let (view_tx, _) = watch::channel(view);

        Ok(Self {
            learner,
            outline,
            catalog,
            progress_store,
            progress,
            selected,
            gate,
            save_state: SaveState::Saved,
            view_tx,
        })
    }

    pub fn learner(&self) -> &LearnerIdentity {
        &self.learner
    }

    pub fn outline(&self) -> &CourseOutline {
        &self.outline
    }

    pub fn progress(&self) -> &ProgressRecord {
        &self.progress
    }

    pub fn selected_lesson(&self) -> Option<&Lesson> {
        self.selected.and_then(|id| self.outline.lesson_by_id(id))
    }

    pub fn view(&self) -> ProgressView {
        self.view_tx.borrow().clone()
    }

    /// UI views subscribe here; the receiver always holds the latest
    /// projection.
    pub fn subscribe(&self) -> watch::Receiver<ProgressView> {
        self.view_tx.subscribe()
    }

    fn publish(&self) {
        self.view_tx.send_replace(view::project(
            &self.outline,
            &self.progress,
            self.selected,
            &self.gate,
            self.save_state,
        ));
    }

    fn confirm(&mut self, fresh: ProgressRecord) {
        self.progress = fresh;
        self.save_state = SaveState::Saved;
        self.publish();
    }

    fn write_failed(&mut self, error: &StoreError) {
        log_error(error);
        self.save_state = SaveState::NotSaved;
        self.publish();
    }

    /// Navigates to a lesson after checking gating, and moves the
    /// "continue learning" pointer.
    pub async fn open_lesson(&mut self, lesson_id: Uuid) -> SessionResult<()> {
        let index = self
            .outline
            .position_of(lesson_id)
            .ok_or(SessionError::NoSuchLesson { lesson_id })?;
        if !engine::is_unlocked(&self.outline, &self.progress, index) {
            return Err(SessionError::LessonLocked { lesson_id });
        }

        match self
            .progress_store
            .record_opened(self.learner.id(), self.outline.course_id(), lesson_id)
            .await
        {
            Ok(fresh) => {
                self.selected = Some(lesson_id);
                if let Some(lesson) = self.outline.lesson_by_id(lesson_id) {
                    self.gate.select_lesson(lesson);
                }
                self.confirm(fresh);
                Ok(())
            }
            Err(e) => {
                self.write_failed(&e);
                Err(e.into())
            }
        }
    }

    /// Flips completion of the selected lesson. The affordance is gated by
    /// the video controller; once the video has finished, the control
    /// becomes a toggle for the review flow.
    pub async fn toggle_completion(&mut self) -> SessionResult<()> {
        let lesson_id = self.selected.ok_or(SessionError::NoLessonSelected)?;
        let lesson = self
            .outline
            .lesson_by_id(lesson_id)
            .ok_or(SessionError::NoSuchLesson { lesson_id })?;
        if !self.gate.can_mark_complete(lesson) {
            return Err(SessionError::VideoNotFinished { lesson_id });
        }

        match self
            .progress_store
            .toggle_completion(self.learner.id(), self.outline.course_id(), lesson_id)
            .await
        {
            Ok(fresh) => {
                self.confirm(fresh);
                Ok(())
            }
            Err(e) => {
                self.write_failed(&e);
                Err(e.into())
            }
        }
    }

    /// One-way completion, used right after a quiz submission. Bypasses the
    /// video gate on purpose; the gate only guards the toggle affordance.
    pub async fn mark_complete(&mut self, lesson_id: Uuid) -> SessionResult<()> {
        if self.outline.position_of(lesson_id).is_none() {
            return Err(SessionError::NoSuchLesson { lesson_id });
        }

        match self
            .progress_store
            .mark_complete(self.learner.id(), self.outline.course_id(), lesson_id)
            .await
        {
            Ok(fresh) => {
                self.confirm(fresh);
                Ok(())
            }
            Err(e) => {
                self.write_failed(&e);
                Err(e.into())
            }
        }
    }

    /// Grades the lesson's quiz and merges the score into the record,
    /// preserving other lessons' scores. Resubmitting overwrites.
    pub async fn submit_quiz(
        &mut self,
        lesson_id: Uuid,
        answers: &HashMap<Uuid, usize>,
    ) -> SessionResult<QuizScore> {
        if self.outline.position_of(lesson_id).is_none() {
            return Err(SessionError::NoSuchLesson { lesson_id });
        }

        let questions = self
            .catalog
            .quiz_questions(self.outline.course_id(), lesson_id)
            .await?;
        let score = engine::score_quiz(&questions, answers);

        match self
            .progress_store
            .merge_quiz_score(self.learner.id(), self.outline.course_id(), lesson_id, score)
            .await
        {
            Ok(fresh) => {
                self.confirm(fresh);
                Ok(score)
            }
            Err(e) => {
                self.write_failed(&e);
                Err(e.into())
            }
        }
    }

    pub fn player_event(&mut self, event: PlayerEvent) {
        self.gate.observe(event);
        self.publish();
    }

    pub fn completion_percent(&self) -> u8 {
        engine::completion_percent(&self.progress, self.outline.lesson_count())
    }

    pub fn is_certificate_eligible(&self) -> bool {
        engine::is_certificate_eligible(&self.progress, self.outline.lesson_count())
    }

    pub fn issue_certificate(&self, issued_on: NaiveDate) -> Option<Certificate> {
        Certificate::issue(
            &self.learner,
            self.outline.title(),
            issued_on,
            &self.progress,
            self.outline.lesson_count(),
        )
    }

    /// Reconciles a pushed store snapshot (another tab or device wrote)
    /// into the projection.
    pub fn apply_remote(&mut self, snapshot: &CollectionSnapshot) {
        let path = paths::progress(self.learner.id(), self.outline.course_id());
        let Some(doc) = snapshot.document(&path) else {
            return;
        };
        match doc.decode::<ProgressRecord>() {
            Ok(fresh) => {
                if fresh != self.progress {
                    self.progress = fresh;
                    self.publish();
                }
            }
            Err(e) => log_error(&e),
        }
    }
}

/// Keeps a shared session reconciled with store change notifications until
/// shut down or dropped.
pub struct RefreshHandle {
    guard: DropGuard,
    task: tokio::task::JoinHandle<()>,
}

impl RefreshHandle {
    pub async fn shutdown(self) {
        drop(self.guard); // cancels the token
        let _ = self.task.await;
    }
}

pub async fn spawn_remote_refresh(
    session: Arc<Mutex<CourseSession>>,
) -> EngineResult<RefreshHandle> {
    let mut rx = {
        let session = session.lock().await;
        session
            .progress_store
            .watch_learner(session.learner.id())
            .await?
    };

    let token = CancellationToken::new();
    let child = token.child_token();
    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = child.cancelled() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break; // store gone
                    }
                    let snapshot = rx.borrow_and_update().clone();
                    session.lock().await.apply_remote(&snapshot);
                }
            }
        }
    });

    Ok(RefreshHandle {
        guard: token.drop_guard(),
        task,
    })
}
