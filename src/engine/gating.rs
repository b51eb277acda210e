use crate::model::{CourseOutline, Lesson, ProgressRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonState {
    Locked,
    Open,
    Completed,
}

/// Whether the lesson at `index` may currently be opened. The first lesson
/// is always open; later ones need the previous lesson done. A lesson that
/// is itself already completed stays reachable even if earlier lessons are
/// un-marked, so completion is never retroactively locked away.
pub fn is_unlocked(outline: &CourseOutline, progress: &ProgressRecord, index: usize) -> bool {
    let Some(lesson) = outline.lesson(index) else {
        return false;
    };
    if index == 0 {
        return true;
    }
    if progress.is_completed(lesson.id()) {
        return true;
    }
    match outline.lesson(index - 1) {
        Some(prev) => progress.is_completed(prev.id()),
        None => true,
    }
}

pub fn lesson_state(outline: &CourseOutline, progress: &ProgressRecord, index: usize) -> LessonState {
    match outline.lesson(index) {
        Some(lesson) if progress.is_completed(lesson.id()) => LessonState::Completed,
        Some(_) if is_unlocked(outline, progress, index) => LessonState::Open,
        _ => LessonState::Locked,
    }
}

/// Where a learner without a "continue learning" pointer starts.
pub fn select_initial_lesson(outline: &CourseOutline) -> Option<&Lesson> {
    outline.lesson(0)
}

/// The lesson to land on when reopening the course: the last opened lesson
/// if it still exists, otherwise the first one.
pub fn resume_lesson<'a>(
    outline: &'a CourseOutline,
    progress: &ProgressRecord,
) -> Option<&'a Lesson> {
    progress
        .last_opened_lesson_id()
        .and_then(|id| outline.lesson_by_id(id))
        .or_else(|| select_initial_lesson(outline))
}
