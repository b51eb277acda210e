//! Instructor-facing reduction of many learners' progress records into
//! per-learner summary rows. Scatter-gather reads: no joins, no
//! transactional cut across learners, and one failing fetch never takes the
//! rest down.

use std::collections::HashMap;
use std::future::Future;

use serde::Serialize;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::config::Config;
use crate::engine;
use crate::model::{LearnerIdentity, ProgressRecord, QuizScore};
use crate::store::StoreResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerSummary {
    identity: LearnerIdentity,
    completed_count: usize,
    total_lessons: usize,
    percent: u8,
    quiz_scores: HashMap<Uuid, QuizScore>,
}

impl LearnerSummary {
    pub fn identity(&self) -> &LearnerIdentity {
        &self.identity
    }

    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    pub fn total_lessons(&self) -> usize {
        self.total_lessons
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn quiz_scores(&self) -> &HashMap<Uuid, QuizScore> {
        &self.quiz_scores
    }
}

/// A snapshot, not a consistent cut: learners may keep progressing while it
/// is being assembled.
#[derive(Debug)]
pub struct CourseProgressReport {
    course_id: Uuid,
    summaries: Vec<LearnerSummary>,
    skipped: usize,
}

impl CourseProgressReport {
    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn summaries(&self) -> &[LearnerSummary] {
        &self.summaries
    }

    /// Learners whose fetch failed and were left out of the summaries.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Fetches every learner's progress record independently and reduces the
/// ones that exist into summary rows, preserving the input order. Learners
/// who never started the course are omitted, not shown as 0%; failed fetches
/// are omitted too and only surface in the skipped count.
pub async fn aggregate_course_progress<F, Fut>(
    course_id: Uuid,
    total_lessons: usize,
    learners: Vec<LearnerIdentity>,
    fetch: F,
) -> CourseProgressReport
where
    F: Fn(Uuid, Uuid) -> Fut,
    Fut: Future<Output = StoreResult<Option<ProgressRecord>>> + Send + 'static,
{
    let limit = Config::get_or_init(cfg!(debug_assertions))
        .await
        .analytics()
        .max_concurrent_fetches()
        .max(1);

    let mut slots: Vec<Option<LearnerSummary>> = Vec::new();
    slots.resize_with(learners.len(), || None);
    let mut skipped = 0usize;

    let mut pending = learners.iter().enumerate();
    let mut tasks: JoinSet<(usize, StoreResult<Option<ProgressRecord>>)> = JoinSet::new();

    loop {
        while tasks.len() < limit {
            let Some((index, learner)) = pending.next() else {
                break;
            };
            let fut = fetch(learner.id(), course_id);
            tasks.spawn(async move { (index, fut.await) });
        }

        match tasks.join_next().await {
            Some(Ok((index, Ok(Some(record))))) => {
                slots[index] = Some(LearnerSummary {
                    identity: learners[index].clone(),
                    completed_count: record.completed_count(),
                    total_lessons,
                    percent: engine::completion_percent(&record, total_lessons),
                    quiz_scores: record.quiz_scores().clone(),
                });
            }
            // never started the course: not a row, not a failure
            Some(Ok((_, Ok(None)))) => {}
            Some(Ok((index, Err(e)))) => {
                tracing::warn!(
                    learner = %learners[index].id(),
                    %course_id,
                    "skipping learner, progress fetch failed: {e}"
                );
                skipped += 1;
            }
            Some(Err(join_error)) => {
                tracing::warn!(%course_id, "skipping learner, progress fetch panicked: {join_error}");
                skipped += 1;
            }
            None => break,
        }
    }

    CourseProgressReport {
        course_id,
        summaries: slots.into_iter().flatten().collect(),
        skipped,
    }
}
