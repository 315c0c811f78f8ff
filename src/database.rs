// src/database.rs

use crate::error::Result as TrackerResult;
use crate::models::NewProblem;
use crate::repository;
use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::{Connection, Result};

pub fn init_db(conn: &Connection) -> Result<()> {
    debug!("init_db: Checking database schema...");

    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS problems (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            platform TEXT NOT NULL,
            url TEXT,
            difficulty TEXT NOT NULL CHECK (difficulty IN ('Easy','Medium','Hard')),
            status TEXT NOT NULL DEFAULT 'Unsolved'
                CHECK (status IN ('Solved','Attempted','ToReview','Unsolved')),
            solved_at TEXT,
            last_reviewed_at TEXT,
            review_count INTEGER NOT NULL DEFAULT 0 CHECK (review_count >= 0),
            notes TEXT,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS problem_tags (
            problem_id INTEGER NOT NULL REFERENCES problems(id) ON DELETE CASCADE,
            tag TEXT NOT NULL,
            PRIMARY KEY (problem_id, tag)
        );
        CREATE INDEX IF NOT EXISTS idx_problems_status ON problems(status);
        CREATE INDEX IF NOT EXISTS idx_problem_tags_tag ON problem_tags(tag);
        ",
    )?;

    Ok(())
}

/// Loads a JSON array of problems into the store. Returns how many were inserted.
pub fn seed_from_json(conn: &Connection, json: &str, now: DateTime<Utc>) -> TrackerResult<usize> {
    let problems: Vec<NewProblem> = serde_json::from_str(json)?;

    let tx = conn.unchecked_transaction()?;
    for p in &problems {
        repository::insert_problem(&tx, p, now)?;
    }
    tx.commit()?;

    info!("Seeded {} problems", problems.len());
    Ok(problems.len())
}

/// Seeds the bundled sample set, but only into an empty store.
pub fn seed_sample_data(conn: &Connection, now: DateTime<Utc>) -> TrackerResult<usize> {
    let count: i64 = conn.query_row("SELECT count(*) FROM problems", [], |row| row.get(0))?;
    if count > 0 {
        debug!("seed_sample_data: store already has {} problems, skipping", count);
        return Ok(0);
    }

    let data = include_str!("data/sample_problems.json");
    seed_from_json(conn, data, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn
    }

    #[test]
    fn init_is_idempotent() {
        let conn = open();
        init_db(&conn).unwrap();
    }

    #[test]
    fn bundled_sample_seeds_once() {
        let conn = open();
        let now = Utc::now();
        let inserted = seed_sample_data(&conn, now).unwrap();
        assert!(inserted > 0);
        assert_eq!(seed_sample_data(&conn, now).unwrap(), 0);
    }

    #[test]
    fn bad_fixture_is_rejected_without_partial_writes() {
        let conn = open();
        let err = seed_from_json(&conn, r#"[{ "title": "x" }]"#, Utc::now());
        assert!(err.is_err());
        let count: i64 = conn
            .query_row("SELECT count(*) FROM problems", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
