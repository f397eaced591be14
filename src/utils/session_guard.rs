// src/utils/session_guard.rs

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::{error::AppError, session::AuthSession};

/// Axum Middleware: Session check.
///
/// Lets the request through only while someone is signed in, and injects the
/// signed-in `User` into the request extensions for handlers to use.
/// Otherwise returns 401 Unauthorized.
pub async fn require_session(
    State(session): State<Arc<AuthSession>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = session
        .current_user()
        .await
        .ok_or_else(|| AppError::AuthError("You must be signed in".to_string()))?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
