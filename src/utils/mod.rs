// src/utils/mod.rs

pub mod session_guard;
