//! Stock validation and reservation.
//!
//! [`reserve_stock`] is the only code path that lowers a product's stock and
//! it does so through the store's conditional decrement, never by reading the
//! quantity and writing back a computed value.

use log::warn;
use uuid::Uuid;

use crate::domain::errors::{DomainError, Entity};
use crate::domain::ports::StoreTx;
use crate::domain::product::Product;

/// Checks that `requested` units of `product` could be supplied right now.
pub fn check_available(product: &Product, requested: i32) -> Result<(), DomainError> {
    if product.quantity == 0 {
        return Err(DomainError::OutOfStock {
            product: product.name.clone(),
        });
    }
    if requested > product.quantity {
        return Err(DomainError::InsufficientStock {
            product: product.name.clone(),
            requested,
            available: product.quantity,
        });
    }
    Ok(())
}

/// Takes `quantity` units of the product out of stock inside the caller's
/// unit of work.
pub fn reserve_stock(
    tx: &mut dyn StoreTx,
    product_id: Uuid,
    quantity: i32,
) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::validation(
            "quantity",
            "must be greater than zero",
        ));
    }
    if tx.decrement_stock_if_available(product_id, quantity)? {
        return Ok(());
    }

    let product = tx
        .find_product(product_id)?
        .ok_or_else(|| DomainError::not_found(Entity::Product, product_id))?;
    warn!(
        "Refused to reserve {} of product {} ({} on hand)",
        quantity, product_id, product.quantity
    );
    Err(DomainError::InsufficientStock {
        product: product.name,
        requested: quantity,
        available: product.quantity,
    })
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::application::fixtures;
    use crate::domain::ports::Store;
    use crate::infrastructure::MemoryStore;

    fn stock(store: &MemoryStore, product_id: Uuid) -> i32 {
        store
            .transaction(|tx| tx.find_product(product_id))
            .expect("find failed")
            .expect("product should exist")
            .quantity
    }

    #[test]
    fn check_available_out_of_stock() {
        let store = MemoryStore::new();
        let product = fixtures::product(&store, "10", "0", 0);
        let err = check_available(&product, 1).unwrap_err();
        assert!(matches!(err, DomainError::OutOfStock { .. }));
    }

    #[test]
    fn check_available_insufficient() {
        let store = MemoryStore::new();
        let product = fixtures::product(&store, "10", "0", 5);
        let err = check_available(&product, 6).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InsufficientStock {
                requested: 6,
                available: 5,
                ..
            }
        ));
        assert!(check_available(&product, 5).is_ok());
    }

    #[test]
    fn reserve_decrements_exactly() {
        let store = MemoryStore::new();
        let product = fixtures::product(&store, "10", "0", 20);
        store
            .transaction(|tx| reserve_stock(tx, product.id, 2))
            .expect("reserve failed");
        assert_eq!(stock(&store, product.id), 18);
    }

    #[test]
    fn reserve_more_than_stock_fails_and_leaves_stock() {
        let store = MemoryStore::new();
        let product = fixtures::product(&store, "10", "0", 3);
        let err = store
            .transaction(|tx| reserve_stock(tx, product.id, 4))
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { available: 3, .. }));
        assert_eq!(stock(&store, product.id), 3);
    }

    #[test]
    fn reserve_unknown_product_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .transaction(|tx| reserve_stock(tx, Uuid::new_v4(), 1))
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
    fn concurrent_reservations_never_oversell() {
        let store = MemoryStore::new();
        let product = fixtures::product(&store, "10", "0", 5);

        let successes = thread::scope(|s| {
            let handles: Vec<_> = (0..12)
                .map(|_| {
                    let store = store.clone();
                    s.spawn(move || {
                        store
                            .transaction(|tx| reserve_stock(tx, product.id, 1))
                            .is_ok()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(false))
                .filter(|reserved| *reserved)
                .count()
        });

        assert_eq!(successes, 5);
        assert_eq!(stock(&store, product.id), 0);
    }
}
