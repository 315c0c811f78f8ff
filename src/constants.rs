// src/constants.rs

// --- Time Constants ---
pub const DAY_SECONDS: i64 = 86400;

// --- Review Priority Thresholds ---
pub const HARD_HIGH_PRIORITY_AFTER_DAYS: i64 = 7; // Hard problems go stale faster
pub const MEDIUM_PRIORITY_AFTER_DAYS: i64 = 14;

// --- Difficulty Weights ---
pub const DIFFICULTY_SCORE_EASY: u8 = 1;
pub const DIFFICULTY_SCORE_MEDIUM: u8 = 2;
pub const DIFFICULTY_SCORE_HARD: u8 = 3;

// --- Spaced Repetition Ladder (days) ---
pub const INTERVAL_STEPS: usize = 5;

// Indexed by Difficulty::index()
pub const REVIEW_INTERVALS: [[i64; INTERVAL_STEPS]; 3] = [
    [1, 3, 7, 14, 30], // Easy
    [1, 2, 5, 10, 21], // Medium
    [1, 2, 4, 8, 16],  // Hard
];

// --- Dashboard ---
pub const TOP_TAGS_LIMIT: usize = 10;

// --- Storage ---
pub const APP_DIR_NAME: &str = "cp-tracker";
pub const DB_FILE_NAME: &str = "tracker.db";
pub const DEFAULT_LOG_FILTER: &str = "info";
