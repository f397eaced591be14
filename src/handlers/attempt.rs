// src/handlers/attempt.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    attempt::{AttemptRegistry, QuizAttempt},
    config::ANONYMOUS_USER_ID,
    error::AppError,
    models::{quiz::PublicQuiz, quiz_result::percentage},
    session::AuthSession,
    store::QuizStore,
};

/// DTO for selecting an option while taking a quiz.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_id: String,
    pub option_id: String,
}

/// Starts a timed attempt on a quiz.
///
/// * Results are credited to the signed-in user, or to `anonymous`.
/// * The countdown starts immediately; when it runs out the attempt submits itself.
/// * Returns the attempt status and the quiz without its answers.
pub async fn start_attempt(
    State(store): State<Arc<QuizStore>>,
    State(session): State<Arc<AuthSession>>,
    State(attempts): State<Arc<AttemptRegistry>>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = session
        .current_user()
        .await
        .map(|u| u.id)
        .unwrap_or_else(|| ANONYMOUS_USER_ID.to_string());

    attempts.prune_submitted().await;

    let attempt = QuizAttempt::start(store, &quiz_id, &user_id)
        .await
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;
    let attempt = attempts.insert(attempt).await;
    let status = attempt.status().await;

    let body = serde_json::json!({
        "attempt": status,
        "quiz": PublicQuiz::from(attempt.quiz()),
    });
    Ok((StatusCode::CREATED, Json(body)))
}

/// Current state, remaining time and answers of an attempt.
pub async fn get_attempt(
    State(attempts): State<Arc<AttemptRegistry>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = find(&attempts, &id).await?;
    Ok(Json(attempt.status().await))
}

/// Records (or changes) the selected option for one question.
pub async fn record_answer(
    State(attempts): State<Arc<AttemptRegistry>>,
    Path(id): Path<String>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = find(&attempts, &id).await?;
    attempt
        .record_answer(&payload.question_id, &payload.option_id)
        .await?;
    Ok(Json(attempt.status().await))
}

/// Submits an attempt before its time runs out.
///
/// Scores the recorded answers, stores the result and stops the countdown.
pub async fn submit_attempt(
    State(attempts): State<Arc<AttemptRegistry>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = find(&attempts, &id).await?;
    let (result_id, score) = attempt.submit().await?;

    Ok(Json(serde_json::json!({
        "resultId": result_id,
        "score": score.achieved,
        "totalPossible": score.total_possible,
        "percentage": percentage(score.achieved, score.total_possible),
    })))
}

async fn find(attempts: &AttemptRegistry, id: &str) -> Result<Arc<QuizAttempt>, AppError> {
    attempts
        .get(id)
        .await
        .ok_or(AppError::NotFound("Attempt not found".to_string()))
}
