//! Services module
//!
//! Business logic sitting between the HTTP handlers and the repository

pub mod products;

pub use products::ProductService;
