mod common;

use std::sync::Arc;

use uuid::Uuid;

use makerworks_engine::analytics::aggregate_course_progress;
use makerworks_engine::store::{MemoryStore, ProgressStore, StoreError};

use common::student;

#[tokio::test]
async fn failing_fetch_skips_only_that_learner() {
    let mem = MemoryStore::new();
    let store = ProgressStore::new(Arc::new(mem.clone()), 3);
    let course = Uuid::new_v4();
    let lessons: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

    let alice = student("alice@example.com");
    let bob = student("bob@example.com"); // never started the course
    let carol = student("carol@example.com");
    let dave = student("dave@example.com"); // his fetch fails

    for lesson in &lessons[..2] {
        store.mark_complete(alice.id(), course, *lesson).await.unwrap();
    }
    store.mark_complete(carol.id(), course, lessons[0]).await.unwrap();

    let failing = dave.id();
    let fetch = {
        let store = store.clone();
        move |learner: Uuid, course: Uuid| {
            let store = store.clone();
            async move {
                if learner == failing {
                    return Err(StoreError::Backend("connection reset".into()));
                }
                store.load(learner, course).await
            }
        }
    };

    let report = aggregate_course_progress(
        course,
        3,
        vec![alice.clone(), bob, carol.clone(), dave],
        fetch,
    )
    .await;

    // only the two learners with readable records show up, in input order
    let emails: Vec<&str> = report
        .summaries()
        .iter()
        .map(|s| s.identity().email())
        .collect();
    assert_eq!(emails, ["alice@example.com", "carol@example.com"]);
    assert_eq!(report.skipped(), 1);

    assert_eq!(report.summaries()[0].completed_count(), 2);
    assert_eq!(report.summaries()[0].percent(), 67);
    assert_eq!(report.summaries()[1].completed_count(), 1);
    assert_eq!(report.summaries()[1].percent(), 33);
    assert_eq!(report.course_id(), course);
}

#[tokio::test]
async fn panicking_fetch_is_absorbed_into_the_skip_count() {
    let mem = MemoryStore::new();
    let store = ProgressStore::new(Arc::new(mem.clone()), 3);
    let course = Uuid::new_v4();
    let lesson = Uuid::new_v4();

    let alice = student("alice@example.com");
    let mallory = student("mallory@example.com");
    let carol = student("carol@example.com");

    store.mark_complete(alice.id(), course, lesson).await.unwrap();
    store.mark_complete(carol.id(), course, lesson).await.unwrap();

    let bad = mallory.id();
    let fetch = {
        let store = store.clone();
        move |learner: Uuid, course: Uuid| {
            let store = store.clone();
            async move {
                if learner == bad {
                    panic!("fetch blew up");
                }
                store.load(learner, course).await
            }
        }
    };

    let report =
        aggregate_course_progress(course, 1, vec![alice, mallory, carol], fetch).await;

    assert_eq!(report.summaries().len(), 2);
    assert_eq!(report.skipped(), 1);
    assert!(report.summaries().iter().all(|s| s.percent() == 100));
}

#[tokio::test]
async fn learners_without_records_are_omitted_not_zero_filled() {
    let mem = MemoryStore::new();
    let store = ProgressStore::new(Arc::new(mem.clone()), 3);
    let course = Uuid::new_v4();

    let idle = student("idle@example.com");
    let fetch = {
        let store = store.clone();
        move |learner: Uuid, course: Uuid| {
            let store = store.clone();
            async move { store.load(learner, course).await }
        }
    };

    let report = aggregate_course_progress(course, 4, vec![idle], fetch).await;
    assert!(report.summaries().is_empty());
    assert_eq!(report.skipped(), 0);
}

#[tokio::test]
async fn quiz_scores_ride_along_in_the_summary() {
    use makerworks_engine::model::QuizScore;

    let mem = MemoryStore::new();
    let store = ProgressStore::new(Arc::new(mem.clone()), 3);
    let course = Uuid::new_v4();
    let lesson = Uuid::new_v4();

    let alice = student("alice@example.com");
    store
        .merge_quiz_score(alice.id(), course, lesson, QuizScore::new(3, 4))
        .await
        .unwrap();

    let fetch = {
        let store = store.clone();
        move |learner: Uuid, course: Uuid| {
            let store = store.clone();
            async move { store.load(learner, course).await }
        }
    };

    let report = aggregate_course_progress(course, 4, vec![alice], fetch).await;
    assert_eq!(
        report.summaries()[0].quiz_scores().get(&lesson),
        Some(&QuizScore::new(3, 4))
    );
}
