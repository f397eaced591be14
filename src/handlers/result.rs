// src/handlers/result.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    models::{
        quiz::Quiz,
        quiz_result::{LeaderboardEntry, QuizResult},
        user::User,
    },
    scoring::{self, QuestionOutcome},
    store::QuizStore,
};

/// Result page payload: the result, the quiz it belongs to and how each question went.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDetail {
    pub result: QuizResult,
    pub quiz: Quiz,
    pub percentage: u32,
    pub questions: Vec<QuestionOutcome>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub quiz_id: Option<String>,
}

/// Retrieves a result with its quiz and a per-question breakdown.
pub async fn get_result(
    State(store): State<Arc<QuizStore>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let result = store
        .get_result(&id)
        .await
        .ok_or(AppError::NotFound("Result not found".to_string()))?;
    let quiz = store
        .get_quiz(&result.quiz_id)
        .await
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(ResultDetail {
        percentage: result.percentage(),
        questions: scoring::breakdown(&quiz, &result.answers),
        result,
        quiz,
    }))
}

/// All results recorded for one quiz.
pub async fn quiz_results(
    State(store): State<Arc<QuizStore>>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if store.get_quiz(&quiz_id).await.is_none() {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }
    Ok(Json(store.get_quiz_results(&quiz_id).await))
}

/// Retrieves the top 10 results, optionally for one quiz (`?quizId=`).
pub async fn get_leaderboard(
    State(store): State<Arc<QuizStore>>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<Vec<LeaderboardEntry>> {
    Json(store.leaderboard(query.quiz_id.as_deref()).await)
}

/// Results submitted by the signed-in user.
pub async fn my_results(
    State(store): State<Arc<QuizStore>>,
    Extension(user): Extension<User>,
) -> Json<Vec<QuizResult>> {
    Json(store.get_user_results(&user.id).await)
}
