// src/models/quiz_result.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ANONYMOUS_USER_ID;

/// One scored attempt at a quiz.
/// Stored as one element of the JSON array under the `results` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: String,
    pub quiz_id: String,

    /// Submitting user, or `anonymous`.
    pub user_id: String,

    /// Question id -> selected option id. Unanswered questions are absent.
    pub answers: HashMap<String, String>,

    /// Points achieved.
    pub score: u32,
    pub total_possible: u32,

    pub submitted_at: DateTime<Utc>,
}

impl QuizResult {
    pub fn percentage(&self) -> u32 {
        percentage(self.score, self.total_possible)
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id == ANONYMOUS_USER_ID
    }
}

/// Data for a result about to be stored; id and timestamp are assigned on submit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResult {
    pub quiz_id: String,
    pub user_id: String,
    pub answers: HashMap<String, String>,
    pub score: u32,
    pub total_possible: u32,
}

/// `score / total` as a whole percentage, rounding halves up.
/// A quiz worth nothing reports 0%.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = u64::from(score) * 100 + u64::from(total) / 2;
    u32::try_from(scaled / u64::from(total)).unwrap_or(u32::MAX)
}

/// Row shown on the leaderboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub result_id: String,
    pub quiz_id: String,

    /// Title of the quiz, absent if it no longer exists.
    pub quiz_title: Option<String>,

    /// `Anonymous` or the user id.
    pub player: String,
    pub score: u32,
    pub total_possible: u32,
    pub percentage: u32,
    pub submitted_at: DateTime<Utc>,
}
