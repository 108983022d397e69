use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::cart::{CartItem, CartRecord};
use super::errors::DomainError;
use super::order::{OrderItem, OrderRecord, Payment};
use super::product::{Address, Product};

/// Opens units of work against shared storage.
pub trait Store: Send + Sync + 'static {
    /// Runs `work` as one transaction: every write it makes is committed when
    /// it returns `Ok` and discarded when it returns `Err`.
    fn transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>;
}

/// Keyed-storage primitives available inside a unit of work.
pub trait StoreTx {
    // ── carts ────────────────────────────────────────────────────────────────

    /// Inserts `cart` unless its owner already has one. Returns whether a row
    /// was written.
    fn insert_cart_if_absent(&mut self, cart: &CartRecord) -> Result<bool, DomainError>;
    /// Reads the owner's cart and holds it exclusively until the unit of work ends.
    fn lock_cart_by_owner(&mut self, owner_id: Uuid) -> Result<Option<CartRecord>, DomainError>;
    fn lock_cart(&mut self, cart_id: Uuid) -> Result<Option<CartRecord>, DomainError>;
    fn find_cart_by_owner(&mut self, owner_id: Uuid) -> Result<Option<CartRecord>, DomainError>;
    fn list_carts(&mut self) -> Result<Vec<CartRecord>, DomainError>;
    fn set_cart_total(&mut self, cart_id: Uuid, total: &BigDecimal) -> Result<(), DomainError>;

    fn cart_items(&mut self, cart_id: Uuid) -> Result<Vec<CartItem>, DomainError>;
    fn insert_cart_item(&mut self, item: &CartItem) -> Result<(), DomainError>;
    fn update_cart_item_quantity(&mut self, item_id: Uuid, quantity: i32)
        -> Result<(), DomainError>;
    fn delete_cart_item(&mut self, item_id: Uuid) -> Result<(), DomainError>;
    /// Removes every item of the cart, returning how many were deleted.
    fn clear_cart_items(&mut self, cart_id: Uuid) -> Result<usize, DomainError>;

    // ── catalog ──────────────────────────────────────────────────────────────

    /// Reads a product; its stock cannot change underneath the caller until
    /// the unit of work ends.
    fn find_product(&mut self, product_id: Uuid) -> Result<Option<Product>, DomainError>;
    fn insert_product(&mut self, product: &Product) -> Result<(), DomainError>;
    /// Overwrites an existing product. Returns `false` when no such product exists.
    fn update_product(&mut self, product: &Product) -> Result<bool, DomainError>;
    /// Atomically subtracts `quantity` from stock if at least that much is on
    /// hand. Returns `false`, leaving stock untouched, otherwise.
    fn decrement_stock_if_available(
        &mut self,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<bool, DomainError>;

    fn find_address(&mut self, address_id: Uuid) -> Result<Option<Address>, DomainError>;
    fn insert_address(&mut self, address: &Address) -> Result<(), DomainError>;

    // ── orders ───────────────────────────────────────────────────────────────

    fn insert_payment(&mut self, payment: &Payment) -> Result<(), DomainError>;
    fn insert_order(&mut self, order: &OrderRecord) -> Result<(), DomainError>;
    fn insert_order_items(&mut self, items: &[OrderItem]) -> Result<(), DomainError>;
    fn find_order(&mut self, order_id: Uuid) -> Result<Option<OrderRecord>, DomainError>;
    fn order_items(&mut self, order_id: Uuid) -> Result<Vec<OrderItem>, DomainError>;
    fn find_payment(&mut self, payment_id: Uuid) -> Result<Option<Payment>, DomainError>;
    /// Newest first.
    fn list_orders_by_owner(
        &mut self,
        owner_email: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderRecord>, DomainError>;
    fn count_orders_by_owner(&mut self, owner_email: &str) -> Result<i64, DomainError>;
}
