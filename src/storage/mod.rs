// src/storage/mod.rs

//! Key/value persistence for the application state.
//!
//! Every value is a JSON document stored under a fixed key. Writes replace the
//! whole value; there is no partial or incremental update.

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use async_trait::async_trait;

use crate::error::AppError;

/// Key holding the JSON array of quizzes.
pub const QUIZZES_KEY: &str = "quizzes";

/// Key holding the JSON array of submitted results.
pub const RESULTS_KEY: &str = "results";

/// Key holding the signed-in user, absent when signed out.
pub const CURRENT_USER_KEY: &str = "currentUser";

#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Reads the raw value stored under `key`.
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Replaces the value stored under `key`.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Replaces several values at once. Either all writes land or none do.
    async fn set_items(&self, items: &[(&str, String)]) -> Result<(), AppError>;

    /// Deletes `key`. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), AppError>;
}
