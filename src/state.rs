// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    attempt::AttemptRegistry, config::Config, error::AppError, session::AuthSession,
    storage::LocalStorage, store::QuizStore,
};

/// Application state shared by every handler.
/// Loaded once at startup; each component saves itself on mutation.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<QuizStore>,
    pub session: Arc<AuthSession>,
    pub attempts: Arc<AttemptRegistry>,
    pub config: Config,
}

impl AppState {
    pub async fn load(storage: Arc<dyn LocalStorage>, config: Config) -> Result<Self, AppError> {
        let store = QuizStore::load(storage.clone()).await?;
        let session = AuthSession::restore(storage).await?;

        Ok(Self {
            store: Arc::new(store),
            session: Arc::new(session),
            attempts: Arc::new(AttemptRegistry::default()),
            config,
        })
    }
}

impl FromRef<AppState> for Arc<QuizStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<AuthSession> {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}

impl FromRef<AppState> for Arc<AttemptRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.attempts.clone()
    }
}
