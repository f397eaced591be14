// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, User},
    session::AuthSession,
};

/// Registers a new user and signs them in.
///
/// Returns 201 Created and the user object.
pub async fn register(
    State(session): State<Arc<AuthSession>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = session.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Signs a user in.
///
/// Any non-empty email and password are accepted; nothing is verified.
pub async fn login(
    State(session): State<Arc<AuthSession>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = session.login(payload).await?;
    Ok(Json(user))
}

pub async fn logout(State(session): State<Arc<AuthSession>>) -> Result<impl IntoResponse, AppError> {
    session.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the signed-in user. Session required.
pub async fn me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}
