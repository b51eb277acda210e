use uuid::Uuid;

use crate::model::Lesson;

/// Event from the external media player. One `Ended` is emitted per
/// lesson-video load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    Ended { lesson_id: Uuid },
}

/// Advisory gate over the "mark complete" affordance: a lesson with a video
/// can only be marked once that video has played to its natural end.
/// Switching to a different lesson re-arms the gate. This is interaction
/// hardening, not a security boundary; `mark_complete` stays callable
/// directly.
#[derive(Debug, Clone, Default)]
pub struct VideoGate {
    selected: Option<Uuid>,
    ended: bool,
}

impl VideoGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_lesson(&mut self, lesson: &Lesson) {
        if self.selected != Some(lesson.id()) {
            self.ended = false;
        }
        self.selected = Some(lesson.id());
    }

    pub fn observe(&mut self, event: PlayerEvent) {
        let PlayerEvent::Ended { lesson_id } = event;
        // stale events from a previous lesson's player are dropped
        if self.selected == Some(lesson_id) {
            self.ended = true;
        }
    }

    pub fn can_mark_complete(&self, lesson: &Lesson) -> bool {
        if !lesson.has_video() {
            return true;
        }
        self.selected == Some(lesson.id()) && self.ended
    }
}
