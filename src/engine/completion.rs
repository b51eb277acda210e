use crate::model::ProgressRecord;

/// Completed lessons as an integer percentage of the course. A course
/// without lessons is 0% by definition, never a division by zero; the count
/// is clamped so a stale completed id can only saturate at 100.
pub fn completion_percent(progress: &ProgressRecord, total_lessons: usize) -> u8 {
    if total_lessons == 0 {
        return 0;
    }
    let completed = progress.completed_count().min(total_lessons);
    ((completed as f64 / total_lessons as f64) * 100.0).round() as u8
}

pub fn is_certificate_eligible(progress: &ProgressRecord, total_lessons: usize) -> bool {
    total_lessons > 0 && completion_percent(progress, total_lessons) == 100
}
