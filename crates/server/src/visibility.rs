//! Rules deciding which questions the public can see.
//!
//! Everything here is a pure function of stored data and a caller-supplied
//! instant. Nothing in this module reads the clock or touches storage.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Question, QuestionRecord};

/// True iff the question went public within the last 24 hours.
///
/// A publication time equal to `now` is recent, anything in the future is not.
pub fn was_published_recently(question: &Question, now: DateTime<Utc>) -> bool {
    let window_start = now - Duration::days(1);
    window_start < question.publication_time && question.publication_time <= now
}

/// True iff the question may appear in listings and be resolved by id.
///
/// A question with no choices is treated exactly like an unpublished one.
pub fn is_listable(question: &Question, choice_count: i64, now: DateTime<Utc>) -> bool {
    question.publication_time <= now && choice_count > 0
}

/// Listable questions, most recently published first.
///
/// Questions sharing a publication time keep creation order.
pub fn list_visible_questions(all_questions: &[QuestionRecord], now: DateTime<Utc>) -> Vec<Question> {
    let mut visible: Vec<Question> = all_questions
        .iter()
        .filter(|record| is_listable(&record.question, record.choice_count, now))
        .map(|record| record.question.clone())
        .collect();

    visible.sort_by(|a, b| {
        b.publication_time
            .cmp(&a.publication_time)
            .then(a.id.cmp(&b.id))
    });
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap()
    }

    fn question(id: i32, publication_time: DateTime<Utc>) -> Question {
        Question {
            id,
            text: format!("Question {id}"),
            publication_time,
        }
    }

    fn record(id: i32, publication_time: DateTime<Utc>, choice_count: i64) -> QuestionRecord {
        QuestionRecord {
            question: question(id, publication_time),
            choice_count,
        }
    }

    #[rstest]
    #[case::future(Duration::days(30), false)]
    #[case::one_second_ahead(Duration::seconds(1), false)]
    #[case::exactly_now(Duration::zero(), true)]
    #[case::one_hour_ago(-Duration::hours(1), true)]
    #[case::just_inside_window(-Duration::days(1) + Duration::seconds(1), true)]
    #[case::exactly_one_day_ago(-Duration::days(1), false)]
    #[case::stale(-Duration::days(30), false)]
    fn recent_publication_window(#[case] offset: Duration, #[case] expected: bool) {
        let q = question(1, now() + offset);
        assert_eq!(was_published_recently(&q, now()), expected);
    }

    #[rstest]
    #[case::past_without_choices(-Duration::days(1), 0, false)]
    #[case::past_with_one_choice(-Duration::days(1), 1, true)]
    #[case::now_with_choices(Duration::zero(), 3, true)]
    #[case::future_with_choices(Duration::days(5), 4, false)]
    #[case::future_without_choices(Duration::days(5), 0, false)]
    fn listable_needs_publication_and_choices(
        #[case] offset: Duration,
        #[case] choice_count: i64,
        #[case] expected: bool,
    ) {
        let q = question(1, now() + offset);
        assert_eq!(is_listable(&q, choice_count, now()), expected);
    }

    #[test]
    fn listing_drops_future_and_choiceless_questions() {
        let records = vec![
            record(1, now() - Duration::days(30), 1),
            record(2, now() + Duration::days(30), 1),
            record(3, now() - Duration::days(2), 0),
        ];

        let visible = list_visible_questions(&records, now());

        assert_eq!(visible, vec![records[0].question.clone()]);
    }

    #[test]
    fn listing_orders_most_recent_first() {
        let records = vec![
            record(1, now() - Duration::days(30), 1),
            record(2, now() - Duration::days(5), 2),
        ];

        let ids: Vec<i32> = list_visible_questions(&records, now())
            .into_iter()
            .map(|q| q.id)
            .collect();

        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn listing_breaks_ties_by_creation_order() {
        let published = now() - Duration::hours(3);
        let records = vec![
            record(7, published, 1),
            record(3, published, 1),
            record(5, now() - Duration::hours(1), 1),
        ];

        let ids: Vec<i32> = list_visible_questions(&records, now())
            .into_iter()
            .map(|q| q.id)
            .collect();

        assert_eq!(ids, vec![5, 3, 7]);
    }

    #[test]
    fn listing_nothing_yields_nothing() {
        assert!(list_visible_questions(&[], now()).is_empty());
    }

    #[test]
    fn listing_is_repeatable() {
        let records = vec![
            record(1, now() - Duration::days(1), 1),
            record(2, now() - Duration::days(2), 1),
        ];

        let first = list_visible_questions(&records, now());
        let second = list_visible_questions(&records, now());

        assert_eq!(first, second);
    }
}
