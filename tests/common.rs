#![allow(dead_code)] // shared between test binaries; not every binary uses every helper

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use makerworks_engine::model::{LearnerIdentity, Role};
use makerworks_engine::store::{DocumentStore, MemoryStore, Patch, Precondition, paths};

/// Builder for a course as an instructor would have authored it, written
/// into the store document by document.
pub struct CourseSeed {
    pub id: Uuid,
    pub title: &'static str,
    pub created_at: DateTime<Utc>,
    pub lessons: Vec<LessonSeed>,
}

pub struct LessonSeed {
    pub id: Uuid,
    pub title: &'static str,
    pub youtube_url: Option<&'static str>,
    pub quizzes: Vec<QuizSeed>,
}

pub struct QuizSeed {
    pub id: Uuid,
    pub question: &'static str,
    pub options: Vec<&'static str>,
    pub correct_index: usize,
}

impl CourseSeed {
    pub fn new(title: &'static str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            lessons: Vec::new(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn lesson(mut self, title: &'static str) -> Self {
        self.lessons.push(LessonSeed {
            id: Uuid::new_v4(),
            title,
            youtube_url: None,
            quizzes: Vec::new(),
        });
        self
    }

    pub fn lesson_with_video(mut self, title: &'static str, url: &'static str) -> Self {
        self.lessons.push(LessonSeed {
            id: Uuid::new_v4(),
            title,
            youtube_url: Some(url),
            quizzes: Vec::new(),
        });
        self
    }

    /// Attaches a quiz question to the most recently added lesson.
    pub fn quiz(
        mut self,
        question: &'static str,
        options: &[&'static str],
        correct_index: usize,
    ) -> Self {
        let lesson = self
            .lessons
            .last_mut()
            .expect("add a lesson before its quiz");
        lesson.quizzes.push(QuizSeed {
            id: Uuid::new_v4(),
            question,
            options: options.to_vec(),
            correct_index,
        });
        self
    }

    pub fn lesson_ids(&self) -> Vec<Uuid> {
        self.lessons.iter().map(|l| l.id).collect()
    }

    pub fn quiz_ids(&self, lesson: usize) -> Vec<Uuid> {
        self.lessons[lesson].quizzes.iter().map(|q| q.id).collect()
    }
}

pub async fn seed_course(store: &MemoryStore, seed: &CourseSeed) {
    store
        .apply(
            &paths::course(seed.id),
            Patch::merge()
                .set("title", json!(seed.title))
                .set("description", json!(""))
                .set("createdAt", json!(seed.created_at))
                .set("lessonCount", json!(seed.lessons.len())),
            Precondition::None,
        )
        .await
        .unwrap();

    for (i, lesson) in seed.lessons.iter().enumerate() {
        let mut patch = Patch::merge()
            .set("title", json!(lesson.title))
            .set("createdAt", json!(seed.created_at + Duration::minutes(i as i64 + 1)));
        if let Some(url) = lesson.youtube_url {
            patch = patch.set("youtubeUrl", json!(url));
        }
        store
            .apply(&paths::lesson(seed.id, lesson.id), patch, Precondition::None)
            .await
            .unwrap();

        for (j, quiz) in lesson.quizzes.iter().enumerate() {
            store
                .apply(
                    &paths::quiz(seed.id, lesson.id, quiz.id),
                    Patch::merge()
                        .set("question", json!(quiz.question))
                        .set("options", json!(quiz.options))
                        .set("correctIndex", json!(quiz.correct_index))
                        .set(
                            "createdAt",
                            json!(seed.created_at + Duration::seconds(j as i64 + 1)),
                        ),
                    Precondition::None,
                )
                .await
                .unwrap();
        }
    }
}

pub fn student(email: &'static str) -> LearnerIdentity {
    LearnerIdentity::new(Uuid::new_v4(), email, Role::Student)
}
