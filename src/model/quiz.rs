use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Document, StoreResult};

/// One multiple-choice question of a lesson's quiz. A lesson with zero
/// questions requires no quiz to complete.
#[derive(Debug, Clone)]
pub struct QuizQuestion {
    id: Uuid,
    lesson_id: Uuid,
    question: String,
    options: Vec<String>,
    correct_index: usize,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QuizQuestionData {
    question: String,
    options: Vec<String>,
    correct_index: usize,
    created_at: Option<DateTime<Utc>>,
}

impl QuizQuestion {
    pub fn new<S: Into<String>>(
        id: Uuid,
        lesson_id: Uuid,
        question: S,
        options: Vec<String>,
        correct_index: usize,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            lesson_id,
            question: question.into(),
            options,
            correct_index,
            created_at,
        }
    }

    pub fn from_document(lesson_id: Uuid, doc: &Document) -> StoreResult<Self> {
        let id = doc.id()?;
        let data: QuizQuestionData = doc.decode()?;
        Ok(Self {
            id,
            lesson_id,
            question: data.question,
            options: data.options,
            correct_index: data.correct_index,
            created_at: data.created_at.unwrap_or(DateTime::UNIX_EPOCH),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    score: u32,
    out_of: u32,
}

impl QuizScore {
    pub fn new(score: u32, out_of: u32) -> Self {
        Self { score, out_of }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn out_of(&self) -> u32 {
        self.out_of
    }
}
