//! Product API Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
/// Application state management
///
/// Handles the product model, the JSON document store and the repository.
pub mod state;
