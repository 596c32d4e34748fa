// Application state management
// Holds the product service shared by every request handler

use super::persistence::ProductStore;
use super::repository::ProductRepository;
use crate::services::ProductService;
use std::path::PathBuf;

/// Main application state
///
/// Shared between handlers as `Arc<RwLock<AppState>>`. Reads take the read
/// lock; mutations hold the write lock across the whole read-modify-write of
/// the document.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Business operations over the catalogue
    pub products: ProductService,
}

impl AppState {
    /// Create application state backed by the document at `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let repository = ProductRepository::new(ProductStore::new(path));
        Self {
            products: ProductService::new(repository),
        }
    }
}
