// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{attempt, auth, quiz, result},
    state::AppState,
    utils::session_guard::require_session,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, quizzes, attempts, results, me).
/// * Guards quiz editing and the personal views behind an active session.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let session_layer = middleware::from_fn_with_state(state.clone(), require_session);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me).route_layer(session_layer.clone()));

    // Creating and editing need a session; reading does not
    let quiz_routes = Router::new()
        .route(
            "/",
            get(quiz::list_quizzes)
                .merge(post(quiz::create_quiz).route_layer(session_layer.clone())),
        )
        .route(
            "/{id}",
            get(quiz::get_quiz).merge(
                put(quiz::update_quiz)
                    .delete(quiz::delete_quiz)
                    .route_layer(session_layer.clone()),
            ),
        )
        .route("/{id}/results", get(result::quiz_results))
        .route("/{id}/attempts", post(attempt::start_attempt));

    let attempt_routes = Router::new()
        .route("/{id}", get(attempt::get_attempt))
        .route("/{id}/answers", put(attempt::record_answer))
        .route("/{id}/submit", post(attempt::submit_attempt));

    let me_routes = Router::new()
        .route("/quizzes", get(quiz::my_quizzes))
        .route("/results", get(result::my_results))
        .route_layer(session_layer);

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/attempts", attempt_routes)
        .route("/api/results/{id}", get(result::get_result))
        .route("/api/leaderboard", get(result::get_leaderboard))
        .nest("/api/me", me_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
