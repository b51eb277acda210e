use std::collections::HashMap;

use uuid::Uuid;

use crate::engine::{self, LessonState, VideoGate};
use crate::model::{CourseOutline, ProgressRecord, QuizScore};

/// Whether the projection matches what the store last confirmed. A failed
/// write keeps the previous confirmed data on screen and flips this to
/// `NotSaved`; the view never claims success for an unpersisted change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Saved,
    NotSaved,
}

#[derive(Debug, Clone)]
pub struct LessonView {
    pub lesson_id: Uuid,
    pub title: String,
    pub state: LessonState,
    pub duration: Option<u32>,
}

/// Everything a course page needs to render, derived from one confirmed
/// progress snapshot.
#[derive(Debug, Clone)]
pub struct ProgressView {
    pub course_id: Uuid,
    pub course_title: String,
    pub lessons: Vec<LessonView>,
    pub selected_lesson_id: Option<Uuid>,
    pub can_mark_selected_complete: bool,
    pub completed_count: usize,
    pub completion_percent: u8,
    pub certificate_eligible: bool,
    pub quiz_scores: HashMap<Uuid, QuizScore>,
    pub save_state: SaveState,
}

pub(crate) fn project(
    outline: &CourseOutline,
    progress: &ProgressRecord,
    selected: Option<Uuid>,
    gate: &VideoGate,
    save_state: SaveState,
) -> ProgressView {
    let lessons = outline
        .lessons()
        .iter()
        .enumerate()
        .map(|(index, lesson)| LessonView {
            lesson_id: lesson.id(),
            title: lesson.title().to_string(),
            state: engine::lesson_state(outline, progress, index),
            duration: lesson.duration(),
        })
        .collect();

    let can_mark_selected_complete = selected
        .and_then(|id| outline.lesson_by_id(id))
        .map(|lesson| gate.can_mark_complete(lesson))
        .unwrap_or(false);

    ProgressView {
        course_id: outline.course_id(),
        course_title: outline.title().to_string(),
        lessons,
        selected_lesson_id: selected,
        can_mark_selected_complete,
        completed_count: progress.completed_count(),
        completion_percent: engine::completion_percent(progress, outline.lesson_count()),
        certificate_eligible: engine::is_certificate_eligible(progress, outline.lesson_count()),
        quiz_scores: progress.quiz_scores().clone(),
        save_state,
    }
}
