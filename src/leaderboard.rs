// src/leaderboard.rs

use std::cmp::Reverse;

use crate::{
    config::LEADERBOARD_SIZE,
    models::{
        quiz::Quiz,
        quiz_result::{LeaderboardEntry, QuizResult},
    },
};

/// Top results, best first.
///
/// Only results for `quiz_id` are considered when it is given and non-empty.
/// Higher scores rank first; on equal scores the earlier submission wins.
/// At most [`LEADERBOARD_SIZE`] results are returned and `results` is left as is.
pub fn rank(results: &[QuizResult], quiz_id: Option<&str>) -> Vec<QuizResult> {
    let filter = quiz_id.filter(|id| !id.is_empty());

    let mut ranked: Vec<&QuizResult> = results
        .iter()
        .filter(|r| filter.is_none_or(|id| r.quiz_id == id))
        .collect();

    ranked.sort_by_key(|r| (Reverse(r.score), r.submitted_at));

    ranked
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .cloned()
        .collect()
}

/// Decorates ranked results with position, player label and quiz title.
pub fn entries(ranked: Vec<QuizResult>, quizzes: &[Quiz]) -> Vec<LeaderboardEntry> {
    ranked
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            let quiz_title = quizzes
                .iter()
                .find(|q| q.id == result.quiz_id)
                .map(|q| q.title.clone());
            let player = if result.is_anonymous() {
                "Anonymous".to_string()
            } else {
                result.user_id.clone()
            };

            LeaderboardEntry {
                rank: index + 1,
                percentage: result.percentage(),
                result_id: result.id,
                quiz_id: result.quiz_id,
                quiz_title,
                player,
                score: result.score,
                total_possible: result.total_possible,
                submitted_at: result.submitted_at,
            }
        })
        .collect()
}
