use bigdecimal::{BigDecimal, Zero};
use log::debug;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartItem, CartRecord, QuantityStep};
use crate::domain::errors::{DomainError, Entity};
use crate::domain::ports::{Store, StoreTx};
use crate::domain::pricing::{line_total, round_money, special_price};

use super::inventory;

/// Cart lifecycle and line-item mutations.
///
/// Every mutation locks the cart row before reading its items, so concurrent
/// requests against one cart apply one after another and the cached total
/// always equals the sum of item contributions once a unit of work commits.
pub struct CartService<S> {
    store: S,
}

impl<S: Store> CartService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the owner's cart, creating an empty one on first use.
    pub fn get_or_create_cart(&self, owner_id: Uuid) -> Result<Cart, DomainError> {
        self.store.transaction(|tx| {
            let record = lock_or_create_cart(tx, owner_id)?;
            load_cart(tx, record)
        })
    }

    pub fn get_cart(&self, owner_id: Uuid) -> Result<Cart, DomainError> {
        self.store.transaction(|tx| {
            let record = tx
                .find_cart_by_owner(owner_id)?
                .ok_or_else(|| DomainError::not_found(Entity::Cart, owner_id))?;
            load_cart(tx, record)
        })
    }

    pub fn list_carts(&self) -> Result<Vec<Cart>, DomainError> {
        self.store.transaction(|tx| {
            let records = tx.list_carts()?;
            records
                .into_iter()
                .map(|record| load_cart(tx, record))
                .collect()
        })
    }

    /// Adds a new line for `product_id`, snapshotting its current sellable
    /// price and discount.
    pub fn add_item(
        &self,
        owner_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Cart, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::validation(
                "quantity",
                "must be greater than zero",
            ));
        }

        self.store.transaction(|tx| {
            let mut record = lock_or_create_cart(tx, owner_id)?;
            let product = tx
                .find_product(product_id)?
                .ok_or_else(|| DomainError::not_found(Entity::Product, product_id))?;

            let items = tx.cart_items(record.id)?;
            if items.iter().any(|i| i.product_id == product_id) {
                return Err(DomainError::Duplicate {
                    product: product.name,
                });
            }
            inventory::check_available(&product, quantity)?;

            let item = CartItem {
                id: Uuid::new_v4(),
                cart_id: record.id,
                product_id,
                quantity,
                price_at_add: special_price(&product.price, &product.discount_percent),
                discount_at_add: product.discount_percent.clone(),
            };
            tx.insert_cart_item(&item)?;
            adjust_total(tx, &mut record, &item.contribution())?;

            debug!(
                "Added {} x {} to cart {} at {}",
                quantity, product_id, record.id, item.price_at_add
            );
            load_cart(tx, record)
        })
    }

    /// Moves an existing line's quantity by exactly one unit. A decrement
    /// that reaches zero removes the line.
    pub fn update_item_quantity(
        &self,
        owner_id: Uuid,
        product_id: Uuid,
        step: QuantityStep,
    ) -> Result<Cart, DomainError> {
        self.store.transaction(|tx| {
            let mut record = tx
                .lock_cart_by_owner(owner_id)?
                .ok_or_else(|| DomainError::not_found(Entity::Cart, owner_id))?;
            let item = find_item(tx, record.id, product_id)?;
            let new_quantity = item.quantity + step.delta();

            if step == QuantityStep::Increment {
                let product = tx
                    .find_product(product_id)?
                    .ok_or_else(|| DomainError::not_found(Entity::Product, product_id))?;
                inventory::check_available(&product, new_quantity)?;
            }

            if new_quantity == 0 {
                tx.delete_cart_item(item.id)?;
            } else {
                tx.update_cart_item_quantity(item.id, new_quantity)?;
            }
            // The stored snapshot prices the change, not the product's current price.
            adjust_total(tx, &mut record, &line_total(&item.price_at_add, step.delta()))?;

            debug!(
                "Cart {} product {} quantity {} -> {}",
                record.id, product_id, item.quantity, new_quantity
            );
            load_cart(tx, record)
        })
    }

    /// Removes the owner's line for `product_id`.
    pub fn remove_item(&self, owner_id: Uuid, product_id: Uuid) -> Result<Cart, DomainError> {
        self.store.transaction(|tx| {
            let record = tx
                .lock_cart_by_owner(owner_id)?
                .ok_or_else(|| DomainError::not_found(Entity::Cart, owner_id))?;
            remove_locked(tx, record, product_id)
        })
    }

    /// Removes a line from a cart addressed by its id. A cart that belongs
    /// to someone other than `owner_id` is reported as missing.
    pub fn remove_item_from_cart(
        &self,
        owner_id: Uuid,
        cart_id: Uuid,
        product_id: Uuid,
    ) -> Result<Cart, DomainError> {
        self.store.transaction(|tx| {
            let record = tx
                .lock_cart(cart_id)?
                .filter(|record| record.owner_id == owner_id)
                .ok_or_else(|| DomainError::not_found(Entity::Cart, cart_id))?;
            remove_locked(tx, record, product_id)
        })
    }
}

/// Locks the owner's cart for the rest of the unit of work.
pub(crate) fn lock_owner_cart(
    tx: &mut dyn StoreTx,
    owner_id: Uuid,
) -> Result<Option<CartRecord>, DomainError> {
    tx.lock_cart_by_owner(owner_id)
}

/// Empties a locked cart. The cart row itself is kept for reuse.
pub(crate) fn clear_cart(
    tx: &mut dyn StoreTx,
    record: &mut CartRecord,
) -> Result<usize, DomainError> {
    let removed = tx.clear_cart_items(record.id)?;
    record.total_price = BigDecimal::zero();
    tx.set_cart_total(record.id, &record.total_price)?;
    Ok(removed)
}

fn lock_or_create_cart(tx: &mut dyn StoreTx, owner_id: Uuid) -> Result<CartRecord, DomainError> {
    if let Some(record) = tx.lock_cart_by_owner(owner_id)? {
        return Ok(record);
    }
    if tx.insert_cart_if_absent(&CartRecord::empty(owner_id))? {
        debug!("Created cart for owner {}", owner_id);
    }
    tx.lock_cart_by_owner(owner_id)?.ok_or_else(|| {
        DomainError::Internal(format!("cart for owner {} missing after insert", owner_id))
    })
}

fn load_cart(tx: &mut dyn StoreTx, record: CartRecord) -> Result<Cart, DomainError> {
    let items = tx.cart_items(record.id)?;
    Ok(Cart::assemble(record, items))
}

fn find_item(
    tx: &mut dyn StoreTx,
    cart_id: Uuid,
    product_id: Uuid,
) -> Result<CartItem, DomainError> {
    tx.cart_items(cart_id)?
        .into_iter()
        .find(|i| i.product_id == product_id)
        .ok_or(DomainError::ItemNotFound { product_id })
}

fn remove_locked(
    tx: &mut dyn StoreTx,
    mut record: CartRecord,
    product_id: Uuid,
) -> Result<Cart, DomainError> {
    let item = find_item(tx, record.id, product_id)?;
    tx.delete_cart_item(item.id)?;
    let delta = -item.contribution();
    adjust_total(tx, &mut record, &delta)?;

    debug!("Removed product {} from cart {}", product_id, record.id);
    load_cart(tx, record)
}

fn adjust_total(
    tx: &mut dyn StoreTx,
    record: &mut CartRecord,
    delta: &BigDecimal,
) -> Result<(), DomainError> {
    record.total_price = round_money(&(&record.total_price + delta));
    tx.set_cart_total(record.id, &record.total_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures::{self, dec};
    use crate::application::CatalogService;
    use crate::domain::product::ProductInput;
    use crate::infrastructure::MemoryStore;

    fn service() -> (MemoryStore, CartService<MemoryStore>) {
        let store = MemoryStore::new();
        (store.clone(), CartService::new(store))
    }

    fn assert_total_consistent(cart: &Cart) {
        assert_eq!(
            cart.total_price,
            cart.items_total(),
            "cached total must equal the sum of line contributions"
        );
    }

    #[test]
    fn get_or_create_returns_same_cart_twice() {
        let (_, carts) = service();
        let owner = Uuid::new_v4();

        let first = carts.get_or_create_cart(owner).expect("first call failed");
        let second = carts.get_or_create_cart(owner).expect("second call failed");

        assert_eq!(first.id, second.id);
        assert!(first.is_empty());
        assert_eq!(first.total_price, BigDecimal::zero());
    }

    #[test]
    fn get_cart_without_cart_is_not_found() {
        let (_, carts) = service();
        let err = carts.get_cart(Uuid::new_v4()).unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: Entity::Cart,
                ..
            }
        ));
    }

    #[test]
    fn add_item_snapshots_special_price() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "2000", "10", 10);
        let owner = Uuid::new_v4();

        let cart = carts.add_item(owner, product.id, 2).expect("add failed");

        assert_eq!(cart.items.len(), 1);
        let item = &cart.items[0];
        assert_eq!(item.price_at_add, dec("1800"));
        assert_eq!(item.discount_at_add, dec("10"));
        assert_eq!(cart.total_price, dec("3600"));
        assert_eq!(cart.owner_id, owner);
    }

    #[test]
    fn add_item_creates_cart_lazily() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "5", "0", 10);
        let owner = Uuid::new_v4();

        let cart = carts.add_item(owner, product.id, 1).expect("add failed");
        let fetched = carts.get_cart(owner).expect("cart should now exist");
        assert_eq!(cart.id, fetched.id);
    }

    #[test]
    fn add_item_out_of_stock() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "10", "0", 0);
        let err = carts.add_item(Uuid::new_v4(), product.id, 1).unwrap_err();
        assert!(matches!(err, DomainError::OutOfStock { .. }));
    }

    #[test]
    fn add_item_insufficient_stock() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "10", "0", 5);
        let err = carts.add_item(Uuid::new_v4(), product.id, 6).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
    }

    #[test]
    fn add_item_duplicate_leaves_cart_unchanged() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "10", "0", 5);
        let owner = Uuid::new_v4();
        carts.add_item(owner, product.id, 1).expect("add failed");

        let err = carts.add_item(owner, product.id, 1).unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { .. }));

        let cart = carts.get_cart(owner).expect("get failed");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_price, dec("10"));
    }

    #[test]
    fn add_item_unknown_product_is_not_found() {
        let (_, carts) = service();
        let err = carts
            .add_item(Uuid::new_v4(), Uuid::new_v4(), 1)
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: Entity::Product,
                ..
            }
        ));
    }

    #[test]
    fn add_item_rejects_non_positive_quantity() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "10", "0", 5);
        let err = carts.add_item(Uuid::new_v4(), product.id, 0).unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "quantity", .. }));
    }

    #[test]
    fn increment_and_decrement_move_total_by_snapshot_price() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "100", "0", 10);
        let owner = Uuid::new_v4();
        carts.add_item(owner, product.id, 2).expect("add failed");

        let cart = carts
            .update_item_quantity(owner, product.id, QuantityStep::Increment)
            .expect("increment failed");
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.total_price, dec("300"));

        let cart = carts
            .update_item_quantity(owner, product.id, QuantityStep::Decrement)
            .expect("decrement failed");
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.total_price, dec("200"));
    }

    #[test]
    fn increment_beyond_stock_is_refused() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "100", "0", 2);
        let owner = Uuid::new_v4();
        carts.add_item(owner, product.id, 2).expect("add failed");

        let err = carts
            .update_item_quantity(owner, product.id, QuantityStep::Increment)
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert_eq!(carts.get_cart(owner).expect("get failed").items[0].quantity, 2);
    }

    #[test]
    fn decrement_to_zero_removes_line() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "100", "0", 2);
        let owner = Uuid::new_v4();
        carts.add_item(owner, product.id, 1).expect("add failed");

        let cart = carts
            .update_item_quantity(owner, product.id, QuantityStep::Decrement)
            .expect("decrement failed");
        assert!(cart.is_empty());
        assert_eq!(cart.total_price, BigDecimal::zero());
    }

    #[test]
    fn update_missing_item_is_item_not_found() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "100", "0", 2);
        let owner = Uuid::new_v4();
        carts.get_or_create_cart(owner).expect("create failed");

        let err = carts
            .update_item_quantity(owner, product.id, QuantityStep::Increment)
            .unwrap_err();
        assert!(matches!(err, DomainError::ItemNotFound { .. }));
    }

    #[test]
    fn remove_item_uses_stored_contribution_after_price_change() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "100", "0", 10);
        let other = fixtures::product(&store, "7.50", "0", 10);
        let owner = Uuid::new_v4();
        carts.add_item(owner, product.id, 2).expect("add failed");
        carts.add_item(owner, other.id, 1).expect("add failed");

        CatalogService::new(store.clone())
            .update_product(
                product.id,
                ProductInput {
                    name: product.name.clone(),
                    quantity: 10,
                    price: dec("250"),
                    discount_percent: dec("0"),
                },
            )
            .expect("price change failed");

        let cart = carts.remove_item(owner, product.id).expect("remove failed");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_price, dec("7.50"));
        assert_total_consistent(&cart);
    }

    #[test]
    fn remove_missing_item_is_item_not_found() {
        let (_, carts) = service();
        let owner = Uuid::new_v4();
        carts.get_or_create_cart(owner).expect("create failed");
        let err = carts.remove_item(owner, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::ItemNotFound { .. }));
    }

    #[test]
    fn remove_item_from_cart_by_cart_id() {
        let (store, carts) = service();
        let product = fixtures::product(&store, "12", "0", 10);
        let owner = Uuid::new_v4();
        let cart = carts.add_item(owner, product.id, 3).expect("add failed");

        let err = carts
            .remove_item_from_cart(Uuid::new_v4(), cart.id, product.id)
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: Entity::Cart,
                ..
            }
        ));
        assert_eq!(carts.get_cart(owner).expect("cart").items.len(), 1);

        let cart = carts
            .remove_item_from_cart(owner, cart.id, product.id)
            .expect("remove failed");
        assert!(cart.is_empty());
        assert_eq!(cart.total_price, BigDecimal::zero());

        let err = carts
            .remove_item_from_cart(owner, Uuid::new_v4(), product.id)
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: Entity::Cart,
                ..
            }
        ));
    }

    #[test]
    fn total_matches_items_after_mixed_mutations() {
        let (store, carts) = service();
        let a = fixtures::product(&store, "19.99", "15", 50);
        let b = fixtures::product(&store, "3.35", "0", 50);
        let c = fixtures::product(&store, "1200", "33", 50);
        let owner = Uuid::new_v4();

        let mut cart = carts.add_item(owner, a.id, 3).expect("add a");
        assert_total_consistent(&cart);
        cart = carts.add_item(owner, b.id, 7).expect("add b");
        assert_total_consistent(&cart);
        cart = carts.add_item(owner, c.id, 1).expect("add c");
        assert_total_consistent(&cart);

        let steps = [
            (a.id, QuantityStep::Increment),
            (b.id, QuantityStep::Decrement),
            (c.id, QuantityStep::Increment),
            (a.id, QuantityStep::Decrement),
            (b.id, QuantityStep::Decrement),
        ];
        for (product_id, step) in steps {
            cart = carts
                .update_item_quantity(owner, product_id, step)
                .expect("update failed");
            assert_total_consistent(&cart);
        }

        cart = carts.remove_item(owner, c.id).expect("remove c");
        assert_total_consistent(&cart);
        cart = carts.remove_item(owner, a.id).expect("remove a");
        assert_total_consistent(&cart);
        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn list_carts_returns_every_cart() {
        let (_, carts) = service();
        carts.get_or_create_cart(Uuid::new_v4()).expect("create failed");
        carts.get_or_create_cart(Uuid::new_v4()).expect("create failed");
        assert_eq!(carts.list_carts().expect("list failed").len(), 2);
    }
}
