// src/lib.rs

pub mod attempt;
pub mod config;
pub mod error;
pub mod handlers;
pub mod leaderboard;
pub mod models;
pub mod routes;
pub mod scoring;
pub mod seed;
pub mod session;
pub mod state;
pub mod storage;
pub mod store;
pub mod utils;

// Re-export specific items for convenience if needed
pub use routes::create_router;
