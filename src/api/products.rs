//! Product API handlers
//!
//! Contains HTTP request handlers for product CRUD operations.

use super::validation::{product_fields, PayloadMode};
use crate::error::AppError;
use crate::state::{AppState, Product, ProductId};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Unwrap a JSON body, turning extractor failures into a 400
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidBody(rejection.body_text()))
}

/// GET /products - List all products
pub async fn list_products(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<Product>>, AppError> {
    let state = state.read().await;
    let products = state.products.list_all().await;

    Ok(Json(products))
}

/// GET /products/:id - Get a specific product
///
/// The service reports absence as `None`; the 404 is produced here.
pub async fn get_product(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    let state = state.read().await;
    let product = state
        .products
        .get_by_id(&id)
        .await
        .ok_or(AppError::NotFound)?;

    Ok(Json(product))
}

/// POST /products - Create a new product
pub async fn create_product(
    State(state): State<Arc<RwLock<AppState>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let fields = product_fields(json_body(payload)?, PayloadMode::Create)?;

    let state = state.write().await;
    let product = state.products.create(fields).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/:id - Update a product
pub async fn update_product(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(id): Path<ProductId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let fields = product_fields(json_body(payload)?, PayloadMode::Update)?;

    let state = state.write().await;
    let product = state.products.update(&id, fields).await?;

    Ok(Json(product))
}

/// DELETE /products/:id - Delete a product
pub async fn delete_product(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AppError> {
    let state = state.write().await;
    state.products.remove(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_state() -> (TempDir, Arc<RwLock<AppState>>) {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(dir.path().join("products.json"));
        (dir, Arc::new(RwLock::new(state)))
    }

    async fn create(state: &Arc<RwLock<AppState>>, body: Value) -> Result<Product, AppError> {
        create_product(State(state.clone()), Ok(Json(body)))
            .await
            .map(|(_, Json(product))| product)
    }

    #[tokio::test]
    async fn test_list_products_empty() {
        let (_dir, state) = create_test_state();
        let Json(products) = list_products(State(state)).await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_create_product() {
        let (_dir, state) = create_test_state();
        let request = json!({ "name": "Pen", "price": 2.5 });

        let result = create_product(State(state.clone()), Ok(Json(request))).await;
        let (status, Json(product)) = result.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(product.name, "Pen");
        assert_eq!(product.price.as_f64(), Some(2.5));

        let Json(products) = list_products(State(state)).await.unwrap();
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn test_create_invalid_payload() {
        let (_dir, state) = create_test_state();
        let result = create(&state, json!({ "name": "Pe", "price": -1 })).await;
        match result {
            Err(AppError::InvalidInput(violations)) => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["name", "price"]);
            }
            other => panic!("Expected InvalidInput error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let (_dir, state) = create_test_state();
        let result = get_product(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_product_partial() {
        let (_dir, state) = create_test_state();
        let created = create(&state, json!({ "name": "Lamp", "price": 15, "stock": 2 }))
            .await
            .unwrap();

        let Json(updated) = update_product(
            State(state.clone()),
            Path(created.id.clone()),
            Ok(Json(json!({ "price": 20.5 }))),
        )
        .await
        .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Lamp");
        assert_eq!(updated.price.as_f64(), Some(20.5));
        assert_eq!(updated.stock, Some(2));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let (_dir, state) = create_test_state();
        let created = create(&state, json!({ "name": "Lamp", "price": 15 }))
            .await
            .unwrap();

        let status = delete_product(State(state.clone()), Path(created.id.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let again = delete_product(State(state), Path(created.id)).await;
        assert!(matches!(again, Err(AppError::NotFound)));
    }
}
