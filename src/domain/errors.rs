use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Entities that can be looked up by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Cart,
    Product,
    Address,
    Order,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Cart => "Cart",
            Entity::Product => "Product",
            Entity::Address => "Address",
            Entity::Order => "Order",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: Entity, id: Uuid },
    #[error("Product {product} already exists in the cart")]
    Duplicate { product: String },
    #[error("{product} is not available")]
    OutOfStock { product: String },
    #[error(
        "Please, make an order of the {product} less than or equal to the quantity: {available}"
    )]
    InsufficientStock {
        product: String,
        requested: i32,
        available: i32,
    },
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Product {product_id} not found in the cart")]
    ItemNotFound { product_id: Uuid },
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: Entity, id: Uuid) -> Self {
        DomainError::NotFound { entity, id }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        DomainError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        let id = Uuid::nil();
        let err = DomainError::not_found(Entity::Address, id);
        assert_eq!(err.to_string(), format!("Address not found with id: {}", id));
    }

    #[test]
    fn insufficient_stock_reports_available_quantity() {
        let err = DomainError::InsufficientStock {
            product: "Laptop".to_string(),
            requested: 6,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "Please, make an order of the Laptop less than or equal to the quantity: 5"
        );
    }

    #[test]
    fn validation_display() {
        let err = DomainError::validation("quantity", "must be positive");
        assert_eq!(err.to_string(), "Invalid quantity: must be positive");
    }
}
