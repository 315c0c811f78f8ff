// src/repository.rs

use crate::models::{Difficulty, NewProblem, ProblemQuery, ProblemRecord, ProblemStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use std::str::FromStr;

const PROBLEM_COLUMNS: &str = "p.id, p.title, p.platform, p.url, p.difficulty, p.status,
     p.solved_at, p.last_reviewed_at, p.review_count, p.notes, p.created_at";

// --- Encoding Helpers ---

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Unparseable timestamps are treated as absent. Accepts the signed
/// 5+ digit years `format_timestamp` writes past 9999.
fn parse_timestamp(problem_id: i64, column: &str, raw: Option<String>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match raw.parse::<DateTime<Utc>>() {
        Ok(ts) => Some(ts),
        Err(e) => {
            warn!(
                "[DB] Problem {}: ignoring malformed {} '{}' ({})",
                problem_id, column, raw, e
            );
            None
        }
    }
}

fn row_to_record(row: &Row) -> Result<ProblemRecord> {
    let id: i64 = row.get(0)?;

    let diff_str: String = row.get(4)?;
    let difficulty = Difficulty::from_str(&diff_str).unwrap_or_else(|_| {
        warn!("[DB] Problem {}: unknown difficulty '{}'", id, diff_str);
        Difficulty::Medium
    });
    let status_str: String = row.get(5)?;
    let status = ProblemStatus::from_str(&status_str).unwrap_or_else(|_| {
        warn!("[DB] Problem {}: unknown status '{}'", id, status_str);
        ProblemStatus::Unsolved
    });

    Ok(ProblemRecord {
        id,
        title: row.get(1)?,
        platform: row.get(2)?,
        url: row.get(3)?,
        status,
        difficulty,
        solved_at: parse_timestamp(id, "solved_at", row.get(6)?),
        last_reviewed_at: parse_timestamp(id, "last_reviewed_at", row.get(7)?),
        review_count: read_review_count(id, row.get(8)?),
        tags: Vec::new(), // Placeholder, filled by caller
        notes: row.get(9)?,
        created_at: parse_timestamp(id, "created_at", row.get(10)?).unwrap_or_default(),
    })
}

/// Out-of-range counts are clamped into `u32`.
fn read_review_count(problem_id: i64, raw: i64) -> u32 {
    u32::try_from(raw).unwrap_or_else(|_| {
        warn!("[DB] Problem {}: review_count {} out of range", problem_id, raw);
        if raw < 0 {
            0
        } else {
            u32::MAX
        }
    })
}

// --- Writes ---

/// Inserts a problem and its tags. Returns the new id.
pub fn insert_problem(conn: &Connection, p: &NewProblem, now: DateTime<Utc>) -> Result<i64> {
    let solved_at = match (p.solved_at, p.status) {
        (Some(ts), _) => Some(ts),
        (None, ProblemStatus::Solved) => Some(now),
        (None, _) => None,
    };

    conn.execute(
        "INSERT INTO problems
            (title, platform, url, difficulty, status, solved_at, last_reviewed_at, review_count, notes, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            p.title.trim(),
            p.platform.trim(),
            p.url,
            p.difficulty.as_str(),
            p.status.as_str(),
            solved_at.map(format_timestamp),
            p.last_reviewed_at.map(format_timestamp),
            p.review_count,
            p.notes,
            format_timestamp(now),
        ],
    )?;
    let id = conn.last_insert_rowid();

    add_tags(conn, id, &p.tags)?;
    debug!("[DB] Inserted problem {} '{}'", id, p.title);
    Ok(id)
}

/// Blank tags are skipped, duplicates ignored.
pub fn add_tags(conn: &Connection, problem_id: i64, tags: &[String]) -> Result<()> {
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO problem_tags (problem_id, tag) VALUES (?, ?)")?;
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        stmt.execute(params![problem_id, tag])?;
    }
    Ok(())
}

pub fn remove_tag(conn: &Connection, problem_id: i64, tag: &str) -> Result<usize> {
    conn.execute(
        "DELETE FROM problem_tags WHERE problem_id = ? AND tag = ?",
        params![problem_id, tag.trim()],
    )
}

/// Returns the number of rows touched (0 when the id is unknown).
pub fn update_status(
    conn: &Connection,
    problem_id: i64,
    status: ProblemStatus,
    solved_at: Option<DateTime<Utc>>,
) -> Result<usize> {
    conn.execute(
        "UPDATE problems SET status = ?, solved_at = ? WHERE id = ?",
        params![status.as_str(), solved_at.map(format_timestamp), problem_id],
    )
}

pub fn update_notes(conn: &Connection, problem_id: i64, notes: Option<&str>) -> Result<usize> {
    conn.execute(
        "UPDATE problems SET notes = ? WHERE id = ?",
        params![notes, problem_id],
    )
}

/// Persists the fields a review touches.
pub fn save_review_state(conn: &Connection, record: &ProblemRecord) -> Result<usize> {
    conn.execute(
        "UPDATE problems SET status = ?, last_reviewed_at = ?, review_count = ? WHERE id = ?",
        params![
            record.status.as_str(),
            record.last_reviewed_at.map(format_timestamp),
            record.review_count,
            record.id
        ],
    )
}

pub fn delete_problem(conn: &Connection, problem_id: i64) -> Result<usize> {
    conn.execute("DELETE FROM problem_tags WHERE problem_id = ?", [problem_id])?;
    conn.execute("DELETE FROM problems WHERE id = ?", [problem_id])
}

// --- Reads ---

pub fn get_tags_for_problem(conn: &Connection, problem_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT tag FROM problem_tags WHERE problem_id = ? ORDER BY rowid")?;

    let tags = stmt
        .query_map([problem_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;

    Ok(tags)
}

pub fn get_problem(conn: &Connection, problem_id: i64) -> Result<Option<ProblemRecord>> {
    let sql = format!("SELECT {} FROM problems p WHERE p.id = ?", PROBLEM_COLUMNS);
    let result = conn.query_row(&sql, [problem_id], row_to_record).optional()?;

    if let Some(mut p) = result {
        p.tags = get_tags_for_problem(conn, p.id)?;
        return Ok(Some(p));
    }
    Ok(None)
}

pub fn list_problems(conn: &Connection, query: &ProblemQuery) -> Result<Vec<ProblemRecord>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(status) = query.status {
        clauses.push("p.status = ?");
        params.push(Box::new(status.as_str()));
    }
    if let Some(difficulty) = query.difficulty {
        clauses.push("p.difficulty = ?");
        params.push(Box::new(difficulty.as_str()));
    }
    if let Some(platform) = &query.platform {
        clauses.push("p.platform = ? COLLATE NOCASE");
        params.push(Box::new(platform.clone()));
    }
    if let Some(tag) = &query.tag {
        clauses.push("EXISTS (SELECT 1 FROM problem_tags t WHERE t.problem_id = p.id AND t.tag = ?)");
        params.push(Box::new(tag.trim().to_string()));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let sql = format!(
        "SELECT {} FROM problems p {} ORDER BY p.id ASC",
        PROBLEM_COLUMNS, where_sql
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut records = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), row_to_record)?
        .collect::<Result<Vec<ProblemRecord>, _>>()?;

    // One tag query per record; collections here stay in the hundreds.
    for r in records.iter_mut() {
        r.tags = get_tags_for_problem(conn, r.id)?;
    }

    debug!("[DB] Listed {} problems", records.len());
    Ok(records)
}
