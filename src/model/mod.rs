mod course;
pub use course::{Course, CourseOutline};

mod identity;
pub use identity::{LearnerIdentity, Role};

mod lesson;
pub use lesson::Lesson;

mod progress;
pub use progress::ProgressRecord;

mod quiz;
pub use quiz::{QuizQuestion, QuizScore};
