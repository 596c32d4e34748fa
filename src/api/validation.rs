//! Request payload validation
//!
//! Product payloads are checked against a static rule table before they are
//! decoded into [`ProductFields`]. All violations are collected so the client
//! sees every offending field at once.

use crate::error::{AppError, FieldViolation};
use crate::state::product::{price_from_value, stock_from_value};
use crate::state::ProductFields;
use serde_json::{Map, Value};

/// Expected JSON type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON string
    String,
    /// JSON number or numeric string
    Number,
    /// Non-negative whole number, as a JSON number or numeric string
    Integer,
}

/// Whether a payload must carry every required field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    /// Full payload: required fields must be present
    Create,
    /// Partial payload: every field may be omitted
    Update,
}

/// Validation rule for a single payload field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// JSON key
    pub field: &'static str,
    /// Expected JSON type
    pub kind: FieldKind,
    /// Must be present on create
    pub required: bool,
    /// Extra check on a value of the right type
    pub constraint: Option<fn(&Value) -> bool>,
    /// Message reported when the field is absent but required
    pub missing_message: &'static str,
    /// Message reported for a value of the wrong type
    pub type_message: &'static str,
    /// Message reported when the constraint rejects the value
    pub constraint_message: &'static str,
}

fn min_three_chars(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.chars().count() >= 3)
}

fn positive(value: &Value) -> bool {
    price_from_value(value)
        .and_then(|n| n.as_f64())
        .is_some_and(|n| n > 0.0)
}

/// Rules applied to product payloads, in reporting order
pub const PRODUCT_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        kind: FieldKind::String,
        required: true,
        constraint: Some(min_three_chars),
        missing_message: "name é obrigatório",
        type_message: "name deve ser string",
        constraint_message: "name deve ter pelo menos 3 caracteres",
    },
    FieldRule {
        field: "price",
        kind: FieldKind::Number,
        required: true,
        constraint: Some(positive),
        missing_message: "price é obrigatório",
        type_message: "price deve ser número maior que 0",
        constraint_message: "price deve ser número maior que 0",
    },
    FieldRule {
        field: "stock",
        kind: FieldKind::Integer,
        required: false,
        constraint: None,
        missing_message: "",
        type_message: "stock deve ser inteiro >= 0",
        constraint_message: "",
    },
    FieldRule {
        field: "description",
        kind: FieldKind::String,
        required: false,
        constraint: None,
        missing_message: "",
        type_message: "description deve ser string",
        constraint_message: "",
    },
];

impl FieldKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => price_from_value(value).is_some(),
            FieldKind::Integer => stock_from_value(value).is_some(),
        }
    }
}

impl FieldRule {
    fn check(&self, body: &Map<String, Value>, mode: PayloadMode) -> Option<FieldViolation> {
        let value = match body.get(self.field) {
            None | Some(Value::Null) => {
                return (self.required && mode == PayloadMode::Create)
                    .then(|| FieldViolation::new(self.field, self.missing_message));
            }
            Some(value) => value,
        };

        if !self.kind.matches(value) {
            return Some(FieldViolation::new(self.field, self.type_message));
        }

        match self.constraint {
            Some(check) if !check(value) => {
                Some(FieldViolation::new(self.field, self.constraint_message))
            }
            _ => None,
        }
    }
}

/// Validate `body` against `rules`, collecting every violation
pub fn validate(body: &Value, rules: &[FieldRule], mode: PayloadMode) -> Vec<FieldViolation> {
    let Some(object) = body.as_object() else {
        return vec![FieldViolation::new("body", "corpo deve ser um objeto JSON")];
    };

    rules
        .iter()
        .filter_map(|rule| rule.check(object, mode))
        .collect()
}

/// Validate a product payload and decode it
///
/// # Returns
/// * `Ok(ProductFields)` - Payload is valid; unknown keys are dropped
/// * `Err(AppError::InvalidInput)` - One or more fields are invalid
pub fn product_fields(body: Value, mode: PayloadMode) -> Result<ProductFields, AppError> {
    let violations = validate(&body, PRODUCT_RULES, mode);
    if !violations.is_empty() {
        tracing::debug!(count = violations.len(), "Rejected product payload");
        return Err(AppError::InvalidInput(violations));
    }

    serde_json::from_value(body).map_err(|e| AppError::Internal(e.into()))
}
