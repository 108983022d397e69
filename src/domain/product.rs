use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;
use super::pricing::{round_money, special_price, validate_pricing};

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// Stock on hand, never negative.
    pub quantity: i32,
    pub price: BigDecimal,
    pub discount_percent: BigDecimal,
    pub special_price: BigDecimal,
}

/// Caller-supplied product fields; the sellable price is always derived.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub discount_percent: BigDecimal,
}

impl ProductInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name", "must not be blank"));
        }
        if self.quantity < 0 {
            return Err(DomainError::validation("quantity", "must not be negative"));
        }
        validate_pricing(&self.price, &self.discount_percent)
    }

    /// Builds the stored product, deriving `special_price` from price and
    /// discount at the scale they are stored with.
    pub fn into_product(self, id: Uuid) -> Product {
        let price = round_money(&self.price);
        let discount_percent = round_money(&self.discount_percent);
        let special_price = special_price(&price, &discount_percent);
        Product {
            id,
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            price,
            discount_percent,
            special_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: Uuid,
    pub street: String,
    pub building_name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,
}

#[derive(Debug, Clone)]
pub struct AddressInput {
    pub street: String,
    pub building_name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,
}

impl AddressInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields: [(&'static str, &str, usize); 6] = [
            ("street", self.street.as_str(), 5),
            ("building_name", self.building_name.as_str(), 5),
            ("city", self.city.as_str(), 2),
            ("state", self.state.as_str(), 2),
            ("country", self.country.as_str(), 2),
            ("zipcode", self.zipcode.as_str(), 4),
        ];
        for (field, value, min) in fields {
            if value.trim().chars().count() < min {
                return Err(DomainError::validation(
                    field,
                    format!("must be at least {} characters long", min),
                ));
            }
        }
        Ok(())
    }

    pub fn into_address(self, id: Uuid) -> Address {
        Address {
            id,
            street: self.street.trim().to_string(),
            building_name: self.building_name.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            country: self.country.trim().to_string(),
            zipcode: self.zipcode.trim().to_string(),
        }
    }
}
