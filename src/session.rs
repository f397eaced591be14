// src/session.rs

//! Simulated sign-in.
//!
//! This is a stand-in for a real identity provider: any non-empty email and
//! password are accepted and nothing is verified or stored besides the
//! resulting user record.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, User},
    storage::{CURRENT_USER_KEY, LocalStorage},
};

/// Id handed out by [`AuthSession::login`].
pub const LOGIN_USER_ID: &str = "user1";

const DEFAULT_ROLE: &str = "user";

/// The single signed-in user, mirrored to the `currentUser` key.
pub struct AuthSession {
    storage: Arc<dyn LocalStorage>,
    current: RwLock<Option<User>>,
}

impl AuthSession {
    /// Picks up the user left signed in by a previous run, if any.
    pub async fn restore(storage: Arc<dyn LocalStorage>) -> Result<Self, AppError> {
        let current = match storage.get_item(CURRENT_USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Discarding unreadable session record: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            storage,
            current: RwLock::new(current),
        })
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    /// Signs in with any non-empty credentials.
    pub async fn login(&self, req: LoginRequest) -> Result<User, AppError> {
        if req.validate().is_err() {
            return Err(AppError::AuthError("Invalid credentials".to_string()));
        }

        let user = User {
            id: LOGIN_USER_ID.to_string(),
            name: local_part(&req.email),
            email: req.email,
            role: DEFAULT_ROLE.to_string(),
        };
        self.sign_in(user).await
    }

    /// Creates a fresh identity and signs it in.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AppError> {
        if req.validate().is_err() {
            return Err(AppError::AuthError("Registration failed".to_string()));
        }

        let name = req
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| local_part(&req.email));
        let user = User {
            id: format!("user{}", Utc::now().timestamp_millis()),
            email: req.email,
            name,
            role: DEFAULT_ROLE.to_string(),
        };
        self.sign_in(user).await
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        let mut current = self.current.write().await;
        self.storage.remove_item(CURRENT_USER_KEY).await?;
        if let Some(user) = current.take() {
            tracing::info!("User {} signed out", user.id);
        }
        Ok(())
    }

    async fn sign_in(&self, user: User) -> Result<User, AppError> {
        let mut current = self.current.write().await;
        self.storage
            .set_item(CURRENT_USER_KEY, &serde_json::to_string(&user)?)
            .await?;
        tracing::info!("User {} signed in", user.id);
        *current = Some(user.clone());
        Ok(user)
    }
}

fn local_part(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}
