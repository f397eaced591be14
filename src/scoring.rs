// src/scoring.rs

use std::collections::HashMap;

use serde::Serialize;

use crate::models::quiz::Quiz;

/// Points achieved against points available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub achieved: u32,
    pub total_possible: u32,
}

/// Scores `answers` (question id -> option id) against `quiz`.
///
/// Every question counts toward `total_possible`. A question earns its points
/// only when the selected option is the correct one; unanswered questions and
/// unknown option ids earn nothing. Sums saturate at `u32::MAX` for data
/// that bypassed the points bound (hand-edited storage).
pub fn score(quiz: &Quiz, answers: &HashMap<String, String>) -> Score {
    quiz.questions.iter().fold(
        Score {
            achieved: 0,
            total_possible: 0,
        },
        |mut acc, question| {
            acc.total_possible = acc.total_possible.saturating_add(question.points);
            if answers.get(&question.id) == Some(&question.correct_option) {
                acc.achieved = acc.achieved.saturating_add(question.points);
            }
            acc
        },
    )
}

/// How one question went, for the results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question_id: String,
    pub selected_option: Option<String>,
    pub correct_option: String,
    pub is_correct: bool,
    pub points_earned: u32,
}

/// Per-question breakdown of `answers`, in question order.
pub fn breakdown(quiz: &Quiz, answers: &HashMap<String, String>) -> Vec<QuestionOutcome> {
    quiz.questions
        .iter()
        .map(|question| {
            let selected = answers.get(&question.id).cloned();
            let is_correct = selected.as_deref() == Some(question.correct_option.as_str());
            QuestionOutcome {
                question_id: question.id.clone(),
                selected_option: selected,
                correct_option: question.correct_option.clone(),
                is_correct,
                points_earned: if is_correct { question.points } else { 0 },
            }
        })
        .collect()
}
