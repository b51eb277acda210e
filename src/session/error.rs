use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("lesson {lesson_id} is not part of this course")]
    NoSuchLesson { lesson_id: Uuid },
    #[error("lesson {lesson_id} is locked, the previous lesson is not completed")]
    LessonLocked { lesson_id: Uuid },
    #[error("no lesson selected")]
    NoLessonSelected,
    #[error("video for lesson {lesson_id} has not finished playing")]
    VideoNotFinished { lesson_id: Uuid },
    #[error("store error: {0}")]
    StoreError(#[from] StoreError),
}
