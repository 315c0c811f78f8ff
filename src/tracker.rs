// src/tracker.rs

use crate::error::{Result, TrackerError};
use crate::models::{
    IntervalPolicy, NewProblem, ProblemQuery, ProblemRecord, ProblemStatus, ReviewFilter,
    ReviewItem, ReviewSort,
};
use crate::repository;
use crate::review;
use crate::stats::{self, DashboardStats};
use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::Connection;
use std::collections::HashSet;

// --- Public Interface ---

pub fn add_problem(conn: &Connection, problem: &NewProblem, now: DateTime<Utc>) -> Result<ProblemRecord> {
    if problem.title.trim().is_empty() {
        return Err(TrackerError::InvalidValue("title must not be empty".to_string()));
    }
    if problem.platform.trim().is_empty() {
        return Err(TrackerError::InvalidValue("platform must not be empty".to_string()));
    }

    let tx = conn.unchecked_transaction()?;
    let id = repository::insert_problem(&tx, problem, now)?;
    tx.commit()?;

    info!("Added problem {} '{}' ({})", id, problem.title, problem.difficulty);
    get_problem(conn, id)
}

pub fn get_problem(conn: &Connection, id: i64) -> Result<ProblemRecord> {
    repository::get_problem(conn, id)?.ok_or(TrackerError::ProblemNotFound(id))
}

pub fn list_problems(conn: &Connection, query: &ProblemQuery) -> Result<Vec<ProblemRecord>> {
    Ok(repository::list_problems(conn, query)?)
}

/// `solved_at` is stamped on the first move to `Solved` and kept afterwards.
pub fn update_status(
    conn: &Connection,
    id: i64,
    status: ProblemStatus,
    now: DateTime<Utc>,
) -> Result<ProblemRecord> {
    let current = get_problem(conn, id)?;
    let solved_at = match (current.solved_at, status) {
        (None, ProblemStatus::Solved) => Some(now),
        (existing, _) => existing,
    };

    repository::update_status(conn, id, status, solved_at)?;
    info!("Problem {}: status {} -> {}", id, current.status, status);
    get_problem(conn, id)
}

/// All-or-nothing: an unknown id rolls back the whole batch.
/// Returns the number of distinct problems updated.
pub fn bulk_update_status(
    conn: &Connection,
    ids: &[i64],
    status: ProblemStatus,
    now: DateTime<Utc>,
) -> Result<usize> {
    let mut seen = HashSet::new();
    let unique: Vec<i64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

    let tx = conn.unchecked_transaction()?;
    for &id in &unique {
        update_status(&tx, id, status, now)?;
    }
    tx.commit()?;

    info!("Bulk status update: {} problems -> {}", unique.len(), status);
    Ok(unique.len())
}

pub fn update_notes(conn: &Connection, id: i64, notes: Option<&str>) -> Result<ProblemRecord> {
    let notes = notes.map(str::trim).filter(|n| !n.is_empty());
    if repository::update_notes(conn, id, notes)? == 0 {
        return Err(TrackerError::ProblemNotFound(id));
    }
    get_problem(conn, id)
}

pub fn add_tags(conn: &Connection, id: i64, tags: &[String]) -> Result<ProblemRecord> {
    get_problem(conn, id)?;
    repository::add_tags(conn, id, tags)?;
    get_problem(conn, id)
}

pub fn remove_tag(conn: &Connection, id: i64, tag: &str) -> Result<ProblemRecord> {
    get_problem(conn, id)?;
    if repository::remove_tag(conn, id, tag)? == 0 {
        debug!("Problem {}: tag '{}' was not present", id, tag);
    }
    get_problem(conn, id)
}

pub fn delete_problem(conn: &Connection, id: i64) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    if repository::delete_problem(&tx, id)? == 0 {
        return Err(TrackerError::ProblemNotFound(id));
    }
    tx.commit()?;

    info!("Deleted problem {}", id);
    Ok(())
}

// --- Review ---

/// Runs a fresh prioritization pass over the live collection.
pub fn review_queue(
    conn: &Connection,
    now: DateTime<Utc>,
    filter: ReviewFilter,
    sort: ReviewSort,
    policy: IntervalPolicy,
) -> Result<Vec<ReviewItem>> {
    let records = repository::list_problems(conn, &ProblemQuery::default())?;
    let items = review::prioritize(&records, now, policy);
    let mut items = review::apply_filter(items, filter, now);
    review::sort_items(&mut items, sort);

    debug!(
        "Review queue: {} items (filter: {:?}, sort: {:?})",
        items.len(),
        filter,
        sort
    );
    Ok(items)
}

pub fn mark_problem_reviewed(conn: &Connection, id: i64, now: DateTime<Utc>) -> Result<ProblemRecord> {
    let mut record = get_problem(conn, id)?;
    let old_status = record.status;

    review::mark_reviewed(&mut record, now);
    repository::save_review_state(conn, &record)?;

    info!(
        "[Review] Problem {}: {} -> {}, reviews: {}",
        id, old_status, record.status, record.review_count
    );
    get_problem(conn, id)
}

pub fn dashboard(conn: &Connection, now: DateTime<Utc>, policy: IntervalPolicy) -> Result<DashboardStats> {
    let records = repository::list_problems(conn, &ProblemQuery::default())?;
    Ok(stats::summarize(&records, now, policy))
}
