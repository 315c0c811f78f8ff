// src/review.rs

//! Review prioritization.
//!
//! Turns problem records into ranked, due-annotated review items. Nothing in
//! here touches the database or fails: absent timestamps fall back to
//! "0 days elapsed" and "now".

use crate::constants::*;
use crate::models::{
    Difficulty, IntervalPolicy, ProblemRecord, ProblemStatus, ReviewFilter, ReviewItem,
    ReviewPriority, ReviewSort,
};
use chrono::{DateTime, Duration, Utc};
use log::debug;

// --- Eligibility ---

/// Only records the user has touched take part in review.
pub fn is_reviewable(record: &ProblemRecord) -> bool {
    matches!(
        record.status,
        ProblemStatus::Solved | ProblemStatus::ToReview | ProblemStatus::Attempted
    )
}

// --- Elapsed Time ---

fn whole_days_between(from: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - from).num_seconds().div_euclid(DAY_SECONDS).max(0)
}

pub fn days_since_solved(record: &ProblemRecord, now: DateTime<Utc>) -> i64 {
    record
        .solved_at
        .map_or(0, |solved| whole_days_between(solved, now))
}

/// Days since the latest of `last_reviewed_at` / `solved_at`, or 0 when neither is set.
pub fn days_since_last_review(record: &ProblemRecord, now: DateTime<Utc>) -> i64 {
    last_touched(record).map_or(0, |ts| whole_days_between(ts, now))
}

fn last_touched(record: &ProblemRecord) -> Option<DateTime<Utc>> {
    match (record.last_reviewed_at, record.solved_at) {
        (Some(reviewed), Some(solved)) => Some(reviewed.max(solved)),
        (reviewed, solved) => reviewed.or(solved),
    }
}

// --- Priority ---

pub fn compute_priority(record: &ProblemRecord, now: DateTime<Utc>) -> ReviewPriority {
    if matches!(
        record.status,
        ProblemStatus::Attempted | ProblemStatus::ToReview
    ) {
        return ReviewPriority::High;
    }

    let days = days_since_solved(record, now);
    if days > HARD_HIGH_PRIORITY_AFTER_DAYS && record.difficulty == Difficulty::Hard {
        ReviewPriority::High
    } else if days > MEDIUM_PRIORITY_AFTER_DAYS {
        ReviewPriority::Medium
    } else {
        ReviewPriority::Low
    }
}

// --- Scheduling ---

/// Interval in days for the given difficulty and policy.
pub fn review_interval_days(difficulty: Difficulty, review_count: u32, policy: IntervalPolicy) -> i64 {
    let step = match policy {
        IntervalPolicy::FirstStep => 0,
        IntervalPolicy::Progressive => (review_count as usize).min(INTERVAL_STEPS - 1),
    };
    REVIEW_INTERVALS[difficulty.index()][step]
}

/// Base date is `last_reviewed_at`, else `solved_at`, else `now`.
pub fn compute_next_review_date(
    record: &ProblemRecord,
    now: DateTime<Utc>,
    policy: IntervalPolicy,
) -> DateTime<Utc> {
    let base = record.last_reviewed_at.or(record.solved_at).unwrap_or(now);
    let days = review_interval_days(record.difficulty, record.review_count, policy);
    base + Duration::days(days)
}

// --- Review Items ---

pub fn build_review_item(
    record: &ProblemRecord,
    now: DateTime<Utc>,
    policy: IntervalPolicy,
) -> ReviewItem {
    ReviewItem {
        review_priority: compute_priority(record, now),
        days_since_last_review: days_since_last_review(record, now),
        difficulty_score: record.difficulty.score(),
        next_review_at: compute_next_review_date(record, now, policy),
        record: record.clone(),
    }
}

/// Eligible records become review items, in input order.
pub fn prioritize(
    records: &[ProblemRecord],
    now: DateTime<Utc>,
    policy: IntervalPolicy,
) -> Vec<ReviewItem> {
    let items: Vec<ReviewItem> = records
        .iter()
        .filter(|r| is_reviewable(r))
        .map(|r| build_review_item(r, now, policy))
        .collect();

    debug!(
        "[Review] Prioritized {} of {} records (policy: {:?})",
        items.len(),
        records.len(),
        policy
    );
    items
}

pub fn apply_filter(items: Vec<ReviewItem>, filter: ReviewFilter, now: DateTime<Utc>) -> Vec<ReviewItem> {
    let overdue_cutoff = now - Duration::days(1);
    match filter {
        ReviewFilter::All => items,
        ReviewFilter::Due => items
            .into_iter()
            .filter(|i| i.next_review_at <= now)
            .collect(),
        ReviewFilter::Overdue => items
            .into_iter()
            .filter(|i| i.next_review_at < overdue_cutoff)
            .collect(),
    }
}

/// Stable: ties keep their incoming order.
pub fn sort_items(items: &mut [ReviewItem], sort: ReviewSort) {
    match sort {
        ReviewSort::Priority => items.sort_by(|a, b| b.review_priority.cmp(&a.review_priority)),
        ReviewSort::Date => items.sort_by(|a, b| a.next_review_at.cmp(&b.next_review_at)),
        ReviewSort::Difficulty => {
            items.sort_by(|a, b| b.difficulty_score.cmp(&a.difficulty_score))
        }
    }
}

// --- State Transition ---

/// Stamps the review and returns the record to `Solved`.
pub fn mark_reviewed(record: &mut ProblemRecord, now: DateTime<Utc>) {
    record.last_reviewed_at = Some(now);
    record.status = ProblemStatus::Solved;
    record.review_count = record.review_count.saturating_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn record(status: ProblemStatus, difficulty: Difficulty) -> ProblemRecord {
        ProblemRecord {
            id: 1,
            title: "Two Sum".to_string(),
            platform: "LeetCode".to_string(),
            url: None,
            status,
            difficulty,
            solved_at: None,
            last_reviewed_at: None,
            review_count: 0,
            tags: vec!["arrays".to_string()],
            notes: None,
            created_at: now() - Duration::days(60),
        }
    }

    fn solved_days_ago(difficulty: Difficulty, days: i64) -> ProblemRecord {
        let mut r = record(ProblemStatus::Solved, difficulty);
        r.solved_at = Some(now() - Duration::days(days));
        r
    }

    #[test]
    fn unsolved_is_not_reviewable() {
        assert!(!is_reviewable(&record(ProblemStatus::Unsolved, Difficulty::Easy)));
        assert!(is_reviewable(&record(ProblemStatus::Solved, Difficulty::Easy)));
        assert!(is_reviewable(&record(ProblemStatus::Attempted, Difficulty::Easy)));
        assert!(is_reviewable(&record(ProblemStatus::ToReview, Difficulty::Easy)));
    }

    #[test]
    fn attempted_and_to_review_are_always_high() {
        for status in [ProblemStatus::Attempted, ProblemStatus::ToReview] {
            let mut r = record(status, Difficulty::Easy);
            r.solved_at = Some(now() - Duration::hours(1));
            assert_eq!(compute_priority(&r, now()), ReviewPriority::High);
        }
    }

    #[test]
    fn hard_problem_goes_high_after_a_week() {
        assert_eq!(
            compute_priority(&solved_days_ago(Difficulty::Hard, 7), now()),
            ReviewPriority::Low
        );
        assert_eq!(
            compute_priority(&solved_days_ago(Difficulty::Hard, 8), now()),
            ReviewPriority::High
        );
        assert_eq!(
            compute_priority(&solved_days_ago(Difficulty::Medium, 8), now()),
            ReviewPriority::Low
        );
    }

    #[test]
    fn anything_older_than_two_weeks_is_medium() {
        assert_eq!(
            compute_priority(&solved_days_ago(Difficulty::Easy, 14), now()),
            ReviewPriority::Low
        );
        assert_eq!(
            compute_priority(&solved_days_ago(Difficulty::Easy, 15), now()),
            ReviewPriority::Medium
        );
        // Hard outranks the two-week rule.
        assert_eq!(
            compute_priority(&solved_days_ago(Difficulty::Hard, 30), now()),
            ReviewPriority::High
        );
    }

    #[test]
    fn partial_days_are_floored() {
        let mut r = record(ProblemStatus::Solved, Difficulty::Easy);
        r.solved_at = Some(now() - Duration::days(15) + Duration::minutes(1));
        assert_eq!(days_since_solved(&r, now()), 14);
        assert_eq!(compute_priority(&r, now()), ReviewPriority::Low);
    }

    #[test]
    fn missing_timestamps_default_to_zero_days() {
        let r = record(ProblemStatus::Solved, Difficulty::Hard);
        assert_eq!(days_since_solved(&r, now()), 0);
        assert_eq!(days_since_last_review(&r, now()), 0);
        assert_eq!(compute_priority(&r, now()), ReviewPriority::Low);
    }

    #[test]
    fn future_timestamps_clamp_to_zero() {
        let mut r = record(ProblemStatus::Solved, Difficulty::Hard);
        r.solved_at = Some(now() + Duration::days(3));
        assert_eq!(days_since_solved(&r, now()), 0);
        assert_eq!(days_since_last_review(&r, now()), 0);
    }

    #[test]
    fn last_review_uses_most_recent_timestamp() {
        let mut r = solved_days_ago(Difficulty::Medium, 20);
        r.last_reviewed_at = Some(now() - Duration::days(3));
        assert_eq!(days_since_last_review(&r, now()), 3);

        // Priority still keys off the solve date.
        assert_eq!(compute_priority(&r, now()), ReviewPriority::Medium);
    }

    #[test]
    fn next_review_is_one_day_after_base_for_every_difficulty() {
        for difficulty in Difficulty::ALL {
            let mut r = solved_days_ago(difficulty, 10);
            r.review_count = 3;
            let base = r.solved_at.unwrap();
            let next = compute_next_review_date(&r, now(), IntervalPolicy::FirstStep);
            assert_eq!(next - base, Duration::days(1));
        }
    }

    #[test]
    fn next_review_prefers_last_review_over_solve() {
        let mut r = solved_days_ago(Difficulty::Easy, 10);
        let reviewed = now() - Duration::days(2);
        r.last_reviewed_at = Some(reviewed);
        let next = compute_next_review_date(&r, now(), IntervalPolicy::FirstStep);
        assert_eq!(next, reviewed + Duration::days(1));
    }

    #[test]
    fn next_review_without_history_is_tomorrow() {
        let r = record(ProblemStatus::ToReview, Difficulty::Medium);
        let next = compute_next_review_date(&r, now(), IntervalPolicy::FirstStep);
        assert_eq!(next, now() + Duration::days(1));
    }

    #[test]
    fn progressive_policy_climbs_and_clamps() {
        assert_eq!(review_interval_days(Difficulty::Easy, 0, IntervalPolicy::Progressive), 1);
        assert_eq!(review_interval_days(Difficulty::Easy, 2, IntervalPolicy::Progressive), 7);
        assert_eq!(review_interval_days(Difficulty::Medium, 3, IntervalPolicy::Progressive), 10);
        assert_eq!(review_interval_days(Difficulty::Hard, 4, IntervalPolicy::Progressive), 16);
        assert_eq!(review_interval_days(Difficulty::Hard, 40, IntervalPolicy::Progressive), 16);
        assert_eq!(review_interval_days(Difficulty::Hard, 40, IntervalPolicy::FirstStep), 1);
    }

    #[test]
    fn prioritize_drops_unsolved_and_keeps_order() {
        let mut a = record(ProblemStatus::Solved, Difficulty::Easy);
        a.id = 1;
        let mut b = record(ProblemStatus::Unsolved, Difficulty::Hard);
        b.id = 2;
        let mut c = record(ProblemStatus::ToReview, Difficulty::Medium);
        c.id = 3;

        let items = prioritize(&[a, b, c], now(), IntervalPolicy::FirstStep);
        let ids: Vec<i64> = items.iter().map(|i| i.record.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn to_review_hard_without_history() {
        let r = record(ProblemStatus::ToReview, Difficulty::Hard);
        let item = build_review_item(&r, now(), IntervalPolicy::FirstStep);
        assert_eq!(item.review_priority, ReviewPriority::High);
        assert_eq!(item.days_since_last_review, 0);
        assert_eq!(item.difficulty_score, 3);
        assert_eq!(item.record, r);
    }

    fn item_due(id: i64, next_review_at: DateTime<Utc>) -> ReviewItem {
        let mut r = record(ProblemStatus::Solved, Difficulty::Easy);
        r.id = id;
        let mut item = build_review_item(&r, now(), IntervalPolicy::FirstStep);
        item.next_review_at = next_review_at;
        item
    }

    #[test]
    fn overdue_cutoff_is_strict() {
        let items = vec![
            item_due(1, now() - Duration::days(1)),
            item_due(2, now() - Duration::days(1) - Duration::seconds(1)),
        ];
        let overdue = apply_filter(items, ReviewFilter::Overdue, now());
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].record.id, 2);
    }

    #[test]
    fn due_includes_now() {
        let items = vec![
            item_due(1, now()),
            item_due(2, now() + Duration::seconds(1)),
        ];
        let due = apply_filter(items, ReviewFilter::Due, now());
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].record.id, 1);
    }

    #[test]
    fn sort_by_date_is_ascending() {
        let mut items = vec![
            item_due(1, now() + Duration::days(3)),
            item_due(2, now() - Duration::days(3)),
            item_due(3, now()),
        ];
        sort_items(&mut items, ReviewSort::Date);
        let ids: Vec<i64> = items.iter().map(|i| i.record.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn sort_by_difficulty_is_descending_and_stable() {
        let mut items: Vec<ReviewItem> = [
            (1, Difficulty::Easy),
            (2, Difficulty::Hard),
            (3, Difficulty::Easy),
            (4, Difficulty::Medium),
        ]
        .into_iter()
        .map(|(id, d)| {
            let mut r = record(ProblemStatus::Solved, d);
            r.id = id;
            build_review_item(&r, now(), IntervalPolicy::FirstStep)
        })
        .collect();

        sort_items(&mut items, ReviewSort::Difficulty);
        let ids: Vec<i64> = items.iter().map(|i| i.record.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn mark_reviewed_resets_to_solved() {
        let mut r = record(ProblemStatus::ToReview, Difficulty::Medium);
        mark_reviewed(&mut r, now());
        assert_eq!(r.status, ProblemStatus::Solved);
        assert_eq!(r.last_reviewed_at, Some(now()));
        assert_eq!(r.review_count, 1);

        mark_reviewed(&mut r, now());
        assert_eq!(r.status, ProblemStatus::Solved);
        assert_eq!(r.last_reviewed_at, Some(now()));
        assert_eq!(r.review_count, 2);
    }
}
