// src/models.rs

use crate::constants::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Data Models ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Weight used when ranking review items by difficulty.
    pub fn score(&self) -> u8 {
        match self {
            Difficulty::Easy => DIFFICULTY_SCORE_EASY,
            Difficulty::Medium => DIFFICULTY_SCORE_MEDIUM,
            Difficulty::Hard => DIFFICULTY_SCORE_HARD,
        }
    }

    /// Row of `REVIEW_INTERVALS` for this difficulty.
    pub fn index(&self) -> usize {
        *self as usize - 1
    }
}

impl FromStr for Difficulty {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("unknown difficulty: {}", s)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemStatus {
    Solved,
    Attempted,
    ToReview,
    Unsolved,
}

impl ProblemStatus {
    pub const ALL: [ProblemStatus; 4] = [
        ProblemStatus::Solved,
        ProblemStatus::Attempted,
        ProblemStatus::ToReview,
        ProblemStatus::Unsolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemStatus::Solved => "Solved",
            ProblemStatus::Attempted => "Attempted",
            ProblemStatus::ToReview => "ToReview",
            ProblemStatus::Unsolved => "Unsolved",
        }
    }
}

impl FromStr for ProblemStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "solved" => Ok(ProblemStatus::Solved),
            "attempted" => Ok(ProblemStatus::Attempted),
            "toreview" => Ok(ProblemStatus::ToReview),
            "unsolved" => Ok(ProblemStatus::Unsolved),
            _ => Err(format!("unknown status: {}", s)),
        }
    }
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReviewPriority {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl ReviewPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewPriority::High => "High",
            ReviewPriority::Medium => "Medium",
            ReviewPriority::Low => "Low",
        }
    }
}

impl fmt::Display for ReviewPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far up the interval ladder a review item climbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntervalPolicy {
    /// Always the first rung: every item comes back one day after its base date.
    #[default]
    FirstStep,
    /// Rung chosen by `review_count`, clamped to the last one.
    Progressive,
}

impl FromStr for IntervalPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first-step" | "first_step" | "firststep" => Ok(IntervalPolicy::FirstStep),
            "progressive" => Ok(IntervalPolicy::Progressive),
            _ => Err(format!("unknown interval policy: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    pub id: i64,
    pub title: String,
    pub platform: String,
    pub url: Option<String>,
    pub status: ProblemStatus,
    pub difficulty: Difficulty,
    pub solved_at: Option<DateTime<Utc>>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub review_count: u32,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a problem. Also the shape of seed fixtures.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProblem {
    pub title: String,
    pub platform: String,
    #[serde(default)]
    pub url: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default = "default_status")]
    pub status: ProblemStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    // Fixtures may carry history; interactive adds leave these empty.
    #[serde(default)]
    pub solved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_count: u32,
}

fn default_status() -> ProblemStatus {
    ProblemStatus::Unsolved
}

/// A record annotated for the review queue. Rebuilt on every pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    #[serde(flatten)]
    pub record: ProblemRecord,
    pub review_priority: ReviewPriority,
    pub days_since_last_review: i64,
    pub difficulty_score: u8,
    pub next_review_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewFilter {
    #[default]
    All,
    Due,
    Overdue,
}

impl FromStr for ReviewFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ReviewFilter::All),
            "due" => Ok(ReviewFilter::Due),
            "overdue" => Ok(ReviewFilter::Overdue),
            _ => Err(format!("unknown filter: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewSort {
    #[default]
    Priority,
    Date,
    Difficulty,
}

impl FromStr for ReviewSort {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "priority" => Ok(ReviewSort::Priority),
            "date" => Ok(ReviewSort::Date),
            "difficulty" => Ok(ReviewSort::Difficulty),
            _ => Err(format!("unknown sort key: {}", s)),
        }
    }
}

/// Optional narrowing for `list_problems`. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ProblemQuery {
    pub status: Option<ProblemStatus>,
    pub difficulty: Option<Difficulty>,
    pub tag: Option<String>,
    pub platform: Option<String>,
}

/// `{success, data, error}` envelope, same shape the hosted problems API returns.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
