//! Product service
//!
//! Business rules over the product repository: name uniqueness and the
//! translation of missing records into [`AppError::NotFound`].

use crate::error::AppError;
use crate::state::{Product, ProductFields, ProductRepository};

/// Message returned when creating a product whose name is taken
pub const DUPLICATE_ON_CREATE: &str = "Já existe um produto com esse nome";
/// Message returned when renaming a product to a name another product uses
pub const DUPLICATE_ON_UPDATE: &str = "Outro produto já usa esse nome";

/// Product service
#[derive(Debug, Clone)]
pub struct ProductService {
    repository: ProductRepository,
}

impl ProductService {
    /// Create a service over the given repository
    pub fn new(repository: ProductRepository) -> Self {
        Self { repository }
    }

    /// Underlying repository
    pub fn repository(&self) -> &ProductRepository {
        &self.repository
    }

    /// List every product
    pub async fn list_all(&self) -> Vec<Product> {
        self.repository.get_all().await
    }

    /// Look up a product; absence is not an error at this layer
    pub async fn get_by_id(&self, id: &str) -> Option<Product> {
        self.repository.get_by_id(id).await
    }

    /// Create a product
    ///
    /// # Returns
    /// * `Ok(Product)` - The stored record with its assigned ID
    /// * `Err(AppError::DuplicateName)` - A product with the same name exists
    pub async fn create(&self, fields: ProductFields) -> Result<Product, AppError> {
        if let Some(name) = fields.name.as_deref() {
            if self.repository.find_by_name(name).await.is_some() {
                return Err(AppError::DuplicateName(DUPLICATE_ON_CREATE.to_string()));
            }
        }

        let product = self.repository.create(fields).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Created product");
        Ok(product)
    }

    /// Update a product with the present fields
    ///
    /// Renaming a product to its own current name is allowed.
    ///
    /// # Returns
    /// * `Ok(Product)` - The merged record
    /// * `Err(AppError::DuplicateName)` - Another product already uses the new name
    /// * `Err(AppError::NotFound)` - No product has this ID
    pub async fn update(&self, id: &str, fields: ProductFields) -> Result<Product, AppError> {
        if let Some(name) = fields.name.as_deref() {
            if let Some(existing) = self.repository.find_by_name(name).await {
                if existing.id != id {
                    return Err(AppError::DuplicateName(DUPLICATE_ON_UPDATE.to_string()));
                }
            }
        }

        let product = self
            .repository
            .update(id, fields)
            .await?
            .ok_or(AppError::NotFound)?;
        tracing::info!(product_id = %id, "Updated product");
        Ok(product)
    }

    /// Remove a product
    ///
    /// # Returns
    /// * `Ok(())` - The product was removed
    /// * `Err(AppError::NotFound)` - No product has this ID
    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        if !self.repository.remove(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(product_id = %id, "Removed product");
        Ok(())
    }
}
