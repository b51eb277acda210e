use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::store::{Document, StoreResult};

/// A single lesson of a course. Read-only to the engine; position within the
/// course is implied by ascending creation time.
#[derive(Debug, Clone)]
pub struct Lesson {
    id: Uuid,
    course_id: Uuid,
    title: String,
    description: Option<String>,
    content: Option<String>,
    youtube_url: Option<String>,
    pdf_url: Option<String>,
    image_urls: Vec<String>,
    duration: Option<u32>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LessonData {
    title: String,
    description: Option<String>,
    content: Option<String>,
    youtube_url: Option<String>,
    pdf_url: Option<String>,
    image_urls: Vec<String>,
    duration: Option<u32>,
    created_at: Option<DateTime<Utc>>,
}

impl Lesson {
    pub fn new<S: Into<String>>(
        id: Uuid,
        course_id: Uuid,
        title: S,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            course_id,
            title: title.into(),
            description: None,
            content: None,
            youtube_url: None,
            pdf_url: None,
            image_urls: Vec::new(),
            duration: None,
            created_at,
        }
    }

    pub fn with_youtube_url<S: Into<String>>(mut self, url: S) -> Self {
        self.youtube_url = Some(url.into());
        self
    }

    pub fn from_document(course_id: Uuid, doc: &Document) -> StoreResult<Self> {
        let id = doc.id()?;
        let data: LessonData = doc.decode()?;
        Ok(Self {
            id,
            course_id,
            title: data.title,
            description: data.description,
            content: data.content,
            youtube_url: data.youtube_url,
            pdf_url: data.pdf_url,
            image_urls: data.image_urls,
            duration: data.duration,
            created_at: data.created_at.unwrap_or(DateTime::UNIX_EPOCH),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn youtube_url(&self) -> Option<&str> {
        self.youtube_url.as_deref()
    }

    pub fn has_video(&self) -> bool {
        self.youtube_url.is_some()
    }

    pub fn pdf_url(&self) -> Option<&str> {
        self.pdf_url.as_deref()
    }

    pub fn image_urls(&self) -> &[String] {
        &self.image_urls
    }

    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
