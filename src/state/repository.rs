// Product repository
// Collection-level operations over the product document

use super::persistence::{PersistenceError, ProductStore, StoredRecord};
use super::product::{Product, ProductFields};

/// Product repository
///
/// Each operation reads the full document, works on it in memory and, for
/// mutations, writes it back. Lookups return `None` as the not-found marker.
/// Entries that are not valid products are invisible to lookups but are
/// written back unchanged.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: ProductStore,
}

impl ProductRepository {
    /// Create a repository over the given store
    pub fn new(store: ProductStore) -> Self {
        Self { store }
    }

    /// Underlying document store
    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    /// All products in stored order
    pub async fn get_all(&self) -> Vec<Product> {
        self.store.load_products().await
    }

    /// Find a product by ID
    pub async fn get_by_id(&self, id: &str) -> Option<Product> {
        self.store
            .load_products()
            .await
            .into_iter()
            .find(|product| product.id == id)
    }

    /// Find the first product whose name matches, ignoring case
    pub async fn find_by_name(&self, name: &str) -> Option<Product> {
        self.store
            .load_products()
            .await
            .into_iter()
            .find(|product| product.has_name(name))
    }

    /// Append a new product with a freshly generated ID
    pub async fn create(&self, fields: ProductFields) -> Result<Product, PersistenceError> {
        let mut records = self.store.load_all().await;
        let product = Product::from_fields(fields);
        records.push(StoredRecord::Product(product.clone()));
        self.store.save_all(&records).await?;

        tracing::debug!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Merge `fields` onto the product with the given ID
    /// Returns `Ok(None)` without writing when the ID is unknown
    pub async fn update(
        &self,
        id: &str,
        fields: ProductFields,
    ) -> Result<Option<Product>, PersistenceError> {
        let mut records = self.store.load_all().await;
        let Some(product) = records.iter_mut().find_map(|record| match record {
            StoredRecord::Product(product) if product.id == id => Some(product),
            _ => None,
        }) else {
            return Ok(None);
        };

        fields.apply_to(product);
        let updated = product.clone();
        self.store.save_all(&records).await?;

        tracing::debug!(product_id = %id, "Product updated");
        Ok(Some(updated))
    }

    /// Remove the entry with the given ID
    /// Returns `Ok(false)` without writing when nothing was removed
    pub async fn remove(&self, id: &str) -> Result<bool, PersistenceError> {
        let records = self.store.load_all().await;
        let before = records.len();
        let remaining: Vec<StoredRecord> = records
            .into_iter()
            .filter(|record| record.id() != Some(id))
            .collect();

        if remaining.len() == before {
            return Ok(false);
        }

        self.store.save_all(&remaining).await?;
        tracing::debug!(product_id = %id, "Product removed");
        Ok(true)
    }
}
