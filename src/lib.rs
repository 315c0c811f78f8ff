// src/lib.rs

//! Competitive programming progress tracker.
//!
//! Problems logged from any judge live in a SQLite store; the `review`
//! module ranks the solved and attempted ones for spaced review.

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod models;
pub mod repository;
pub mod review;
pub mod stats;
pub mod tracker;

pub use config::Config;
pub use error::{Result, TrackerError};
pub use models::{
    ApiResponse, Difficulty, IntervalPolicy, NewProblem, ProblemQuery, ProblemRecord,
    ProblemStatus, ReviewFilter, ReviewItem, ReviewPriority, ReviewSort,
};
pub use stats::DashboardStats;
