// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::{
        quiz::{CreateQuizRequest, PublicQuiz, Quiz, UpdateQuizRequest},
        user::User,
    },
    store::QuizStore,
};

/// Lists public quizzes, without their answers.
pub async fn list_quizzes(State(store): State<Arc<QuizStore>>) -> Json<Vec<PublicQuiz>> {
    let quizzes = store.public_quizzes().await;
    Json(quizzes.iter().map(PublicQuiz::from).collect())
}

/// Retrieves a quiz for taking it. Correct options are not included.
pub async fn get_quiz(
    State(store): State<Arc<QuizStore>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store
        .get_quiz(&id)
        .await
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(PublicQuiz::from(&quiz)))
}

/// Creates a quiz owned by the signed-in user.
/// Returns 201 Created and the new id.
pub async fn create_quiz(
    State(store): State<Arc<QuizStore>>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = store.create_quiz(payload, &user.id).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Edits a quiz. Only its creator may do so.
pub async fn update_quiz(
    State(store): State<Arc<QuizStore>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    owned_quiz(&store, &id, &user).await?;

    let quiz = store
        .update_quiz(&id, payload)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(quiz))
}

/// Deletes a quiz together with its results. Only its creator may do so.
pub async fn delete_quiz(
    State(store): State<Arc<QuizStore>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    owned_quiz(&store, &id, &user).await?;

    if !store.delete_quiz(&id).await? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Quizzes created by the signed-in user, with answers.
pub async fn my_quizzes(
    State(store): State<Arc<QuizStore>>,
    Extension(user): Extension<User>,
) -> Json<Vec<Quiz>> {
    Json(store.get_user_quizzes(&user.id).await)
}

async fn owned_quiz(store: &QuizStore, id: &str, user: &User) -> Result<Quiz, AppError> {
    let quiz = store
        .get_quiz(id)
        .await
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if quiz.created_by != user.id {
        return Err(AppError::Forbidden(
            "Only the creator can change this quiz".to_string(),
        ));
    }
    Ok(quiz)
}
