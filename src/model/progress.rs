use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::QuizScore;

/// The per-(learner, course) progress document. Decoded exactly once at the
/// store adapter boundary; every missing field falls back to its default
/// here instead of in consuming code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    started_at: Option<DateTime<Utc>>,
    completed_lessons: Vec<Uuid>,
    last_opened_lesson_id: Option<Uuid>,
    last_opened_at: Option<DateTime<Utc>>,
    quiz_scores: HashMap<Uuid, QuizScore>,
}

impl ProgressRecord {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_lessons(&self) -> &[Uuid] {
        &self.completed_lessons
    }

    pub fn completed_count(&self) -> usize {
        self.completed_lessons.len()
    }

    pub fn is_completed(&self, lesson_id: Uuid) -> bool {
        self.completed_lessons.contains(&lesson_id)
    }

    pub fn last_opened_lesson_id(&self) -> Option<Uuid> {
        self.last_opened_lesson_id
    }

    pub fn last_opened_at(&self) -> Option<DateTime<Utc>> {
        self.last_opened_at
    }

    pub fn quiz_scores(&self) -> &HashMap<Uuid, QuizScore> {
        &self.quiz_scores
    }

    pub fn quiz_score(&self, lesson_id: Uuid) -> Option<QuizScore> {
        self.quiz_scores.get(&lesson_id).copied()
    }
}
