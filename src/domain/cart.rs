use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use super::pricing::line_total;

/// Cart row without its line items; `total_price` is the cached aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub total_price: BigDecimal,
}

impl CartRecord {
    pub fn empty(owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            total_price: BigDecimal::zero(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Product special price captured when the item was added.
    pub price_at_add: BigDecimal,
    pub discount_at_add: BigDecimal,
}

impl CartItem {
    /// What this line currently adds to the cart total.
    pub fn contribution(&self) -> BigDecimal {
        line_total(&self.price_at_add, self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub items: Vec<CartItem>,
    pub total_price: BigDecimal,
}

impl Cart {
    pub fn assemble(record: CartRecord, items: Vec<CartItem>) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id,
            items,
            total_price: record.total_price,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, product_id: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Sum of line contributions, independent of the cached total.
    pub fn items_total(&self) -> BigDecimal {
        self.items
            .iter()
            .fold(BigDecimal::zero(), |acc, item| acc + item.contribution())
    }
}

/// Single-unit quantity change for an existing cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityStep {
    Increment,
    Decrement,
}

impl QuantityStep {
    /// `delete` (any case) decrements; every other operation word increments.
    pub fn from_operation(operation: &str) -> Self {
        if operation.eq_ignore_ascii_case("delete") {
            QuantityStep::Decrement
        } else {
            QuantityStep::Increment
        }
    }

    pub fn delta(self) -> i32 {
        match self {
            QuantityStep::Increment => 1,
            QuantityStep::Decrement => -1,
        }
    }
}
