pub mod cart;
pub mod errors;
pub mod order;
pub mod ports;
pub mod pricing;
pub mod product;

use uuid::Uuid;

/// The caller on whose behalf a cart or order operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: Uuid,
    pub email: String,
}

impl Owner {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}
