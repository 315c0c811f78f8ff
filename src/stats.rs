// src/stats.rs

//! Dashboard summary over the whole problem collection.

use crate::constants::TOP_TAGS_LIMIT;
use crate::models::{
    Difficulty, IntervalPolicy, ProblemRecord, ProblemStatus, ReviewFilter, ReviewPriority,
};
use crate::review;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub by_status: Vec<(ProblemStatus, usize)>,
    pub by_difficulty: Vec<(Difficulty, usize)>,
    pub reviewable: usize,
    pub due: usize,
    pub overdue: usize,
    pub by_priority: Vec<(ReviewPriority, usize)>,
    pub top_tags: Vec<(String, usize)>,
}

pub fn summarize(records: &[ProblemRecord], now: DateTime<Utc>, policy: IntervalPolicy) -> DashboardStats {
    let mut status_counts: HashMap<ProblemStatus, usize> = HashMap::new();
    let mut difficulty_counts: HashMap<Difficulty, usize> = HashMap::new();
    let mut tag_counts: HashMap<&str, usize> = HashMap::new();

    for r in records {
        *status_counts.entry(r.status).or_default() += 1;
        *difficulty_counts.entry(r.difficulty).or_default() += 1;
        for tag in &r.tags {
            *tag_counts.entry(tag.as_str()).or_default() += 1;
        }
    }

    let items = review::prioritize(records, now, policy);
    let reviewable = items.len();

    let mut priority_counts: HashMap<ReviewPriority, usize> = HashMap::new();
    for item in &items {
        *priority_counts.entry(item.review_priority).or_default() += 1;
    }

    let due = review::apply_filter(items.clone(), ReviewFilter::Due, now).len();
    let overdue = review::apply_filter(items, ReviewFilter::Overdue, now).len();

    let mut top_tags: Vec<(String, usize)> = tag_counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    top_tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_tags.truncate(TOP_TAGS_LIMIT);

    DashboardStats {
        total: records.len(),
        by_status: ProblemStatus::ALL
            .iter()
            .map(|s| (*s, status_counts.get(s).copied().unwrap_or(0)))
            .collect(),
        by_difficulty: Difficulty::ALL
            .iter()
            .map(|d| (*d, difficulty_counts.get(d).copied().unwrap_or(0)))
            .collect(),
        reviewable,
        due,
        overdue,
        by_priority: [ReviewPriority::High, ReviewPriority::Medium, ReviewPriority::Low]
            .iter()
            .map(|p| (*p, priority_counts.get(p).copied().unwrap_or(0)))
            .collect(),
        top_tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn record(id: i64, status: ProblemStatus, difficulty: Difficulty, solved_days_ago: Option<i64>, tags: &[&str]) -> ProblemRecord {
        ProblemRecord {
            id,
            title: format!("P{}", id),
            platform: "AtCoder".to_string(),
            url: None,
            status,
            difficulty,
            solved_at: solved_days_ago.map(|d| now() - Duration::days(d)),
            last_reviewed_at: None,
            review_count: 0,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            notes: None,
            created_at: now() - Duration::days(90),
        }
    }

    #[test]
    fn empty_collection() {
        let s = summarize(&[], now(), IntervalPolicy::FirstStep);
        assert_eq!(s.total, 0);
        assert_eq!(s.reviewable, 0);
        assert!(s.by_status.iter().all(|(_, n)| *n == 0));
        assert!(s.top_tags.is_empty());
    }

    #[test]
    fn counts_everything_in_one_summary() {
        let records = vec![
            record(1, ProblemStatus::Solved, Difficulty::Easy, Some(30), &["dp", "greedy"]),
            record(2, ProblemStatus::Solved, Difficulty::Hard, Some(10), &["dp"]),
            record(3, ProblemStatus::ToReview, Difficulty::Medium, None, &["graphs"]),
            record(4, ProblemStatus::Unsolved, Difficulty::Hard, None, &["dp"]),
        ];
        let s = summarize(&records, now(), IntervalPolicy::FirstStep);

        assert_eq!(s.total, 4);
        assert_eq!(s.reviewable, 3);
        assert_eq!(
            s.by_status,
            vec![
                (ProblemStatus::Solved, 2),
                (ProblemStatus::Attempted, 0),
                (ProblemStatus::ToReview, 1),
                (ProblemStatus::Unsolved, 1),
            ]
        );
        assert_eq!(
            s.by_difficulty,
            vec![(Difficulty::Easy, 1), (Difficulty::Medium, 1), (Difficulty::Hard, 2)]
        );
        assert_eq!(
            s.by_priority,
            vec![
                (ReviewPriority::High, 2),
                (ReviewPriority::Medium, 1),
                (ReviewPriority::Low, 0),
            ]
        );
        // #1 due 29 days ago, #2 due 9 days ago, #3 due tomorrow.
        assert_eq!(s.due, 2);
        assert_eq!(s.overdue, 2);
        assert_eq!(s.top_tags[0], ("dp".to_string(), 3));
        assert_eq!(s.top_tags[1], ("graphs".to_string(), 1));
        assert_eq!(s.top_tags[2], ("greedy".to_string(), 1));
    }
}
