use std::collections::HashMap;

use uuid::Uuid;

use crate::model::{QuizQuestion, QuizScore};

/// Grades a submitted answer set. An unanswered question counts as
/// incorrect; an answer referencing an unknown question id is ignored; an
/// option index outside the question's range never counts as correct.
pub fn score_quiz(questions: &[QuizQuestion], answers: &HashMap<Uuid, usize>) -> QuizScore {
    let correct = questions
        .iter()
        .filter(|q| match answers.get(&q.id()) {
            Some(&picked) => picked < q.options().len() && picked == q.correct_index(),
            None => false,
        })
        .count();

    QuizScore::new(correct as u32, questions.len() as u32)
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn questions(correct_indices: &[usize]) -> Vec<QuizQuestion> {
        let lesson_id = Uuid::new_v4();
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        correct_indices
            .iter()
            .enumerate()
            .map(|(i, &correct)| {
                QuizQuestion::new(
                    Uuid::new_v4(),
                    lesson_id,
                    format!("Q{}", i + 1),
                    vec!["a".into(), "b".into(), "c".into()],
                    correct,
                    base + Duration::seconds(i as i64),
                )
            })
            .collect()
    }

    #[test]
    fn three_of_four_correct() {
        let qs = questions(&[0, 1, 2, 0]);
        let answers: HashMap<Uuid, usize> = qs
            .iter()
            .zip([0usize, 1, 2, 1]) // last one wrong
            .map(|(q, a)| (q.id(), a))
            .collect();

        assert_eq!(score_quiz(&qs, &answers), QuizScore::new(3, 4));
    }

    #[test]
    fn missing_answer_counts_wrong_without_error() {
        let qs = questions(&[0, 1]);
        let answers: HashMap<Uuid, usize> = [(qs[0].id(), 0)].into();

        assert_eq!(score_quiz(&qs, &answers), QuizScore::new(1, 2));
    }

    #[test]
    fn unknown_question_id_is_ignored() {
        let qs = questions(&[0]);
        let answers: HashMap<Uuid, usize> = [(qs[0].id(), 0), (Uuid::new_v4(), 0)].into();

        assert_eq!(score_quiz(&qs, &answers), QuizScore::new(1, 1));
    }

    #[test]
    fn out_of_range_pick_never_counts() {
        let lesson_id = Uuid::new_v4();
        let q = QuizQuestion::new(
            Uuid::new_v4(),
            lesson_id,
            "Q1",
            vec!["a".into()],
            7, // malformed authoring data
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        );
        let answers: HashMap<Uuid, usize> = [(q.id(), 7)].into();

        assert_eq!(score_quiz(&[q], &answers), QuizScore::new(0, 1));
    }

    #[test]
    fn empty_quiz_scores_zero_of_zero() {
        let answers = HashMap::new();
        assert_eq!(score_quiz(&[], &answers), QuizScore::new(0, 0));
    }
}
