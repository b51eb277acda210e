use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::model::Lesson;
use crate::store::{Document, StoreResult};

#[derive(Debug, Clone)]
pub struct Course {
    id: Uuid,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    // denormalized counter maintained by authoring, not by the engine
    lesson_count: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CourseData {
    title: String,
    description: String,
    created_at: Option<DateTime<Utc>>,
    lesson_count: usize,
}

impl Course {
    pub fn new<S: Into<String>>(
        id: Uuid,
        title: S,
        description: S,
        created_at: DateTime<Utc>,
        lesson_count: usize,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            created_at,
            lesson_count,
        }
    }

    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        let id = doc.id()?;
        let data: CourseData = doc.decode()?;
        Ok(Self {
            id,
            title: data.title,
            description: data.description,
            created_at: data.created_at.unwrap_or(DateTime::UNIX_EPOCH),
            lesson_count: data.lesson_count,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn lesson_count(&self) -> usize {
        self.lesson_count
    }
}

/// A course together with its lessons in presentation order. This is the
/// unit the gating engine operates on; the ordering invariant lives here and
/// nowhere else.
#[derive(Debug, Clone)]
pub struct CourseOutline {
    course_id: Uuid,
    course: Option<Course>,
    lessons: Vec<Lesson>,
}

impl CourseOutline {
    pub fn new(course_id: Uuid, course: Option<Course>, mut lessons: Vec<Lesson>) -> Self {
        lessons.sort_by_key(Lesson::created_at);
        Self {
            course_id,
            course,
            lessons,
        }
    }

    /// Outline of a course that no longer exists or has no lessons yet.
    pub fn empty(course_id: Uuid) -> Self {
        Self {
            course_id,
            course: None,
            lessons: Vec::new(),
        }
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn title(&self) -> &str {
        self.course.as_ref().map(Course::title).unwrap_or("")
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    pub fn has_content(&self) -> bool {
        !self.lessons.is_empty()
    }

    pub fn lesson(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index)
    }

    pub fn lesson_by_id(&self, lesson_id: Uuid) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id() == lesson_id)
    }

    pub fn position_of(&self, lesson_id: Uuid) -> Option<usize> {
        self.lessons.iter().position(|l| l.id() == lesson_id)
    }
}
