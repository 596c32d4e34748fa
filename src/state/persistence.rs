// Product document persistence
// Loads and saves the whole catalogue as a single JSON document

use super::product::Product;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Error types for persistence operations
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// File I/O error
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// JSON serialization error
    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// One entry of the product document
///
/// Entries that do not decode as a [`Product`] are carried verbatim so a
/// rewrite never drops them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredRecord {
    /// A well-formed product
    Product(Product),
    /// Any other JSON value found in the document
    Unrecognized(Value),
}

impl StoredRecord {
    /// Decode a single document entry
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value(value.clone()) {
            Ok(product) => StoredRecord::Product(product),
            Err(_) => StoredRecord::Unrecognized(value),
        }
    }

    /// The product, if this entry is one
    pub fn as_product(&self) -> Option<&Product> {
        match self {
            StoredRecord::Product(product) => Some(product),
            StoredRecord::Unrecognized(_) => None,
        }
    }

    /// The `id` of this entry, whether or not it decoded
    pub fn id(&self) -> Option<&str> {
        match self {
            StoredRecord::Product(product) => Some(&product.id),
            StoredRecord::Unrecognized(value) => value.get("id").and_then(Value::as_str),
        }
    }
}

/// Handle on the on-disk product document
///
/// Every call reads or rewrites the complete document; nothing is cached.
#[derive(Debug, Clone)]
pub struct ProductStore {
    path: PathBuf,
}

impl ProductStore {
    /// Create a store backed by the document at `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every entry from the document, in stored order
    ///
    /// A missing document, or one that is not a JSON array, yields an empty
    /// catalogue; the failure is logged and never returned. Entries are
    /// decoded one by one, so a single malformed record does not hide the
    /// others.
    pub async fn load_all(&self) -> Vec<StoredRecord> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "Failed to read product document");
                }
                return Vec::new();
            }
        };

        let values: Vec<Value> = match serde_json::from_str(&json) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Product document is not a JSON array, treating as empty");
                return Vec::new();
            }
        };

        let records: Vec<StoredRecord> = values.into_iter().map(StoredRecord::from_value).collect();
        let unrecognized = records.iter().filter(|r| r.as_product().is_none()).count();
        if unrecognized > 0 {
            tracing::warn!(
                path = %self.path.display(),
                count = unrecognized,
                "Product document holds records that are not valid products, keeping them untouched"
            );
        }
        records
    }

    /// Load only the entries that decode as products
    pub async fn load_products(&self) -> Vec<Product> {
        self.load_all()
            .await
            .into_iter()
            .filter_map(|record| match record {
                StoredRecord::Product(product) => Some(product),
                StoredRecord::Unrecognized(_) => None,
            })
            .collect()
    }

    /// Overwrite the document with `records`
    ///
    /// Written pretty-printed, one field per line. The parent directory is
    /// created when missing.
    pub async fn save_all(&self, records: &[StoredRecord]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, json).await?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "Saved product document");
        Ok(())
    }

    /// Default document location: `data/products.json` next to the executable
    /// Falls back to the current directory when the executable path is unknown
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_default()
            .join("data")
            .join("products.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Number};
    use tempfile::{tempdir, NamedTempFile};

    fn product(id: &str, name: &str) -> StoredRecord {
        StoredRecord::Product(Product {
            id: id.to_string(),
            name: name.to_string(),
            price: Number::from_f64(1.5).unwrap(),
            stock: None,
            description: None,
            extra: Map::new(),
        })
    }

    #[tokio::test]
    async fn test_save_and_load_from_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = ProductStore::new(temp_file.path());

        let records = vec![product("1", "Pen"), product("2", "Chair")];
        store.save_all(&records).await.unwrap();

        assert_eq!(store.load_all().await, records);
        assert_eq!(store.load_products().await.len(), 2);
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = tempdir().unwrap();
        let store = ProductStore::new(dir.path().join("missing.json"));
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_from_corrupt_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "{ not json").unwrap();

        let store = ProductStore::new(temp_file.path());
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_record_does_not_hide_others() {
        let temp_file = NamedTempFile::new().unwrap();
        let stored = json!([
            { "id": "a", "name": "Pen", "price": "2.5" },
            { "id": "b", "name": "Chair", "price": 3 },
            { "id": "c", "name": "Broken", "stock": -1 }
        ]);
        std::fs::write(temp_file.path(), stored.to_string()).unwrap();

        let store = ProductStore::new(temp_file.path());
        let records = store.load_all().await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_product().unwrap().price.as_f64(), Some(2.5));
        assert_eq!(records[1].as_product().unwrap().name, "Chair");
        assert!(records[2].as_product().is_none());
        assert_eq!(records[2].id(), Some("c"));
    }

    #[tokio::test]
    async fn test_unrecognized_records_written_back_verbatim() {
        let temp_file = NamedTempFile::new().unwrap();
        let broken = json!({ "id": "c", "name": "Broken", "stock": -1 });
        std::fs::write(temp_file.path(), json!([broken.clone()]).to_string()).unwrap();

        let store = ProductStore::new(temp_file.path());
        let mut records = store.load_all().await;
        records.push(product("d", "Desk"));
        store.save_all(&records).await.unwrap();

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(temp_file.path()).unwrap()).unwrap();
        assert_eq!(raw[0], broken);
        assert_eq!(raw[1]["name"], "Desk");
    }

    #[tokio::test]
    async fn test_save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("products.json");
        let store = ProductStore::new(&path);

        store.save_all(&[product("1", "Pen")]).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_into_directory_fails() {
        let dir = tempdir().unwrap();
        let store = ProductStore::new(dir.path());

        let result = store.save_all(&[product("1", "Pen")]).await;
        assert!(matches!(result, Err(PersistenceError::IoError(_))));
    }

    #[tokio::test]
    async fn test_document_is_pretty_printed() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = ProductStore::new(temp_file.path());
        store.save_all(&[product("1", "Pen")]).await.unwrap();

        let raw = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"id\": \"1\""));
    }

    #[test]
    fn test_default_path_file_name() {
        let path = ProductStore::default_path();
        assert!(path.ends_with("data/products.json"));
    }
}
