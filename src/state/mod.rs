// State management module
// Handles the product model, the document store and the repository over it

pub mod app_state;
pub mod persistence;
pub mod product;
pub mod repository;

pub use app_state::AppState;
pub use persistence::{PersistenceError, ProductStore, StoredRecord};
pub use product::{Product, ProductFields, ProductId};
pub use repository::ProductRepository;
