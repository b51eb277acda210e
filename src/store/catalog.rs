use std::sync::Arc;

use uuid::Uuid;

use crate::model::{Course, CourseOutline, Lesson, QuizQuestion};
use crate::store::{DocumentStore, StoreResult, paths};

/// Read-only typed view over the authoring side of the store. Course,
/// lesson, and quiz documents are owned by instructors; the engine only ever
/// reads them here.
#[derive(Clone)]
pub struct CourseCatalog {
    store: Arc<dyn DocumentStore>,
}

impl CourseCatalog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All published courses, newest first.
    pub async fn courses(&self) -> StoreResult<Vec<Course>> {
        let mut courses = Vec::new();
        for doc in self.store.list(&paths::courses()).await? {
            courses.push(Course::from_document(&doc)?);
        }
        courses.sort_by_key(|c| std::cmp::Reverse(c.created_at()));
        Ok(courses)
    }

    /// The course and its lessons in presentation order. A course deleted
    /// mid-navigation degrades to an outline without content instead of an
    /// error.
    pub async fn course_outline(&self, course_id: Uuid) -> StoreResult<CourseOutline> {
        let course = match self.store.get(&paths::course(course_id)).await? {
            Some(doc) => Some(Course::from_document(&doc)?),
            None => None,
        };

        let mut lessons = Vec::new();
        for doc in self.store.list(&paths::lessons(course_id)).await? {
            lessons.push(Lesson::from_document(course_id, &doc)?);
        }

        Ok(CourseOutline::new(course_id, course, lessons))
    }

    /// The quiz for one lesson, in authoring order. A lesson without
    /// questions requires no quiz.
    pub async fn quiz_questions(
        &self,
        course_id: Uuid,
        lesson_id: Uuid,
    ) -> StoreResult<Vec<QuizQuestion>> {
        let mut questions = Vec::new();
        for doc in self.store.list(&paths::quizzes(course_id, lesson_id)).await? {
            questions.push(QuizQuestion::from_document(lesson_id, &doc)?);
        }
        questions.sort_by_key(QuizQuestion::created_at);
        Ok(questions)
    }
}
