//! API module
//!
//! Contains the router, the HTTP handlers for product endpoints and the
//! payload validation they share.

pub mod products;
pub mod router;
pub mod validation;

pub use router::router;
