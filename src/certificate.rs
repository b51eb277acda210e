use chrono::NaiveDate;

use crate::engine::is_certificate_eligible;
use crate::model::{LearnerIdentity, ProgressRecord};

/// Completion certificate. Derived on demand, never persisted; issuing is
/// gated by full completion of a course that actually has content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    recipient: String,
    course_title: String,
    issued_on: NaiveDate,
}

impl Certificate {
    pub fn issue(
        identity: &LearnerIdentity,
        course_title: &str,
        issued_on: NaiveDate,
        progress: &ProgressRecord,
        total_lessons: usize,
    ) -> Option<Self> {
        if !is_certificate_eligible(progress, total_lessons) {
            return None;
        }
        Some(Self {
            recipient: identity.email().to_string(),
            course_title: course_title.to_string(),
            issued_on,
        })
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn course_title(&self) -> &str {
        &self.course_title
    }

    pub fn issued_on(&self) -> NaiveDate {
        self.issued_on
    }

    /// The printable certificate text. Pure formatting; the UI layer owns
    /// the actual export format.
    pub fn render(&self) -> String {
        format!(
            "Certificate of Completion\n\
             \n\
             This is to certify that\n\
             \n\
             {recipient}\n\
             \n\
             has successfully completed the course\n\
             \n\
             \"{title}\"\n\
             \n\
             Date: {date}    Instructor: ___________________\n",
            recipient = self.recipient,
            title = self.course_title,
            date = self.issued_on.format("%Y-%m-%d"),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::Role;
    use serde_json::json;
    use uuid::Uuid;

    fn learner() -> LearnerIdentity {
        LearnerIdentity::new(Uuid::new_v4(), "maker@example.com", Role::Student)
    }

    fn completed(n: usize) -> ProgressRecord {
        let ids: Vec<Uuid> = (0..n).map(|_| Uuid::new_v4()).collect();
        serde_json::from_value(json!({ "completedLessons": ids })).unwrap()
    }

    #[test]
    fn refuses_partial_completion() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(Certificate::issue(&learner(), "Woodworking", date, &completed(2), 3).is_none());
        assert!(Certificate::issue(&learner(), "Woodworking", date, &completed(0), 0).is_none());
    }

    #[test]
    fn renders_recipient_course_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let cert = Certificate::issue(&learner(), "Woodworking", date, &completed(3), 3).unwrap();

        let text = cert.render();
        assert!(text.starts_with("Certificate of Completion"));
        assert!(text.contains("maker@example.com"));
        assert!(text.contains("\"Woodworking\""));
        assert!(text.contains("2024-06-01"));
    }
}
