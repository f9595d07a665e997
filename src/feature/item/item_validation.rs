//! Validation of incoming item payloads.
//!
//! A request body deserializes into an [`ItemPayload`], which may have any
//! shape. The only way to obtain an [`ItemInput`] is through
//! [`ItemPayload::validate`], so nothing downstream can reach the store
//! with an unchecked payload.

use crate::infra::error::ValidationError;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

/// An item payload as it arrives over the wire: parsed, but not yet checked.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct ItemPayload {
    /// The candidate name; any JSON value until validated.
    #[schema(value_type = Option<Object>, example = "Widget")]
    pub name: Option<Value>,
    /// The candidate price; any JSON value until validated.
    #[schema(value_type = Option<Object>, example = 10.0)]
    pub price: Option<Value>,
}

/// A validated item payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemInput {
    /// The item's name, non-empty.
    pub name: String,
    /// The item's price, non-negative.
    pub price: f64,
}

impl ItemPayload {
    /// Checks every rule independently and reports all violations, not just
    /// the first. Errors come out in field declaration order so responses
    /// are reproducible.
    pub fn validate(self) -> Result<ItemInput, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let name = match self.name {
            Some(Value::String(name)) if !name.is_empty() => Some(name),
            _ => {
                errors.push(ValidationError::required("name"));
                None
            }
        };

        // An explicit price of 0 is present, not missing.
        let price = match self.price.as_ref().and_then(Value::as_f64) {
            Some(price) if price < 0.0 => {
                errors.push(ValidationError::negative("price"));
                None
            }
            Some(price) => Some(price),
            None => {
                errors.push(ValidationError::required("price"));
                None
            }
        };

        match (name, price) {
            (Some(name), Some(price)) => Ok(ItemInput { name, price }),
            _ => Err(errors),
        }
    }
}
