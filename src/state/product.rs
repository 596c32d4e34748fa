// Product model
// Stored record plus the partial field set used by create and update

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

/// Unique identifier for a product
pub type ProductId = String;

/// Product structure
/// A single record of the persisted catalogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique identifier, assigned on creation
    pub id: ProductId,
    /// Display name, unique case-insensitively across the catalogue
    pub name: String,
    /// Unit price, always greater than zero
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Number,
    /// Units in stock
    #[serde(
        default,
        deserialize_with = "deserialize_stock",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock: Option<u64>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keys written by other tools, kept as-is across rewrites
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Build a new product from submitted fields with a freshly generated ID
    ///
    /// Missing `name`/`price` fall back to empty values; callers validate the
    /// payload before reaching this point.
    pub fn from_fields(fields: ProductFields) -> Self {
        Self {
            id: Self::generate_id(),
            name: fields.name.unwrap_or_default(),
            price: fields.price.unwrap_or_else(|| Number::from(0)),
            stock: fields.stock,
            description: fields.description,
            extra: Map::new(),
        }
    }

    /// Generate a new unique ID for a product
    /// Uses UUID v4 for uniqueness
    pub fn generate_id() -> ProductId {
        Uuid::new_v4().to_string()
    }

    /// Case-insensitive name comparison
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Read a price from a JSON number or a numeric string
pub fn price_from_value(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s.trim()) {
            Ok(Value::Number(n)) => Some(n),
            _ => None,
        },
        _ => None,
    }
}

/// Read a stock level from a non-negative whole number or a numeric string
pub fn stock_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Number, D::Error> {
    let value = Value::deserialize(deserializer)?;
    price_from_value(&value).ok_or_else(|| D::Error::custom(format!("invalid price: {}", value)))
}

fn deserialize_optional_price<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Number>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => price_from_value(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid price: {}", value))),
    }
}

fn deserialize_stock<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => stock_from_value(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid stock: {}", value))),
    }
}

/// Product fields submitted by a client
///
/// Every field is optional so the same type carries both a full create
/// payload and a partial update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductFields {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New price
    #[serde(
        default,
        deserialize_with = "deserialize_optional_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Number>,
    /// New stock level
    #[serde(
        default,
        deserialize_with = "deserialize_stock",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock: Option<u64>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductFields {
    /// Shallow-merge the present fields onto `product`
    /// Fields left as `None` keep their current value
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = Some(stock);
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
    }
}
