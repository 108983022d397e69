use std::collections::HashMap;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::cart::{CartItem, CartRecord};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderItem, OrderRecord, Payment};
use crate::domain::ports::{Store, StoreTx};
use crate::domain::product::{Address, Product};

#[derive(Debug, Clone, Default)]
struct Tables {
    products: HashMap<Uuid, Product>,
    addresses: HashMap<Uuid, Address>,
    carts: Vec<CartRecord>,
    cart_items: Vec<CartItem>,
    payments: HashMap<Uuid, Payment>,
    orders: Vec<OrderRecord>,
    order_items: Vec<OrderItem>,
}

/// Process-local store. A unit of work holds the single table lock from
/// start to finish, so units of work are fully serialised. The first write of
/// a unit of work snapshots the tables; the snapshot is restored unless the
/// work returns `Ok`, including when it panics.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>,
    {
        let mut tables = self.tables.lock();
        let mut tx = MemoryTx {
            tables: &mut *tables,
            snapshot: None,
            committed: false,
        };

        let result = work(&mut tx);
        tx.committed = result.is_ok();
        result
    }
}

struct MemoryTx<'a> {
    tables: &'a mut Tables,
    snapshot: Option<Tables>,
    committed: bool,
}

impl MemoryTx<'_> {
    fn write(&mut self) -> &mut Tables {
        if self.snapshot.is_none() {
            self.snapshot = Some(self.tables.clone());
        }
        &mut *self.tables
    }
}

impl Drop for MemoryTx<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Some(snapshot) = self.snapshot.take() {
            *self.tables = snapshot;
        }
    }
}

impl StoreTx for MemoryTx<'_> {
    fn insert_cart_if_absent(&mut self, cart: &CartRecord) -> Result<bool, DomainError> {
        if self.tables.carts.iter().any(|c| c.owner_id == cart.owner_id) {
            return Ok(false);
        }
        self.write().carts.push(cart.clone());
        Ok(true)
    }

    fn lock_cart_by_owner(&mut self, owner_id: Uuid) -> Result<Option<CartRecord>, DomainError> {
        self.find_cart_by_owner(owner_id)
    }

    fn lock_cart(&mut self, cart_id: Uuid) -> Result<Option<CartRecord>, DomainError> {
        Ok(self.tables.carts.iter().find(|c| c.id == cart_id).cloned())
    }

    fn find_cart_by_owner(&mut self, owner_id: Uuid) -> Result<Option<CartRecord>, DomainError> {
        Ok(self
            .tables
            .carts
            .iter()
            .find(|c| c.owner_id == owner_id)
            .cloned())
    }

    fn list_carts(&mut self) -> Result<Vec<CartRecord>, DomainError> {
        Ok(self.tables.carts.clone())
    }

    fn set_cart_total(&mut self, cart_id: Uuid, total: &BigDecimal) -> Result<(), DomainError> {
        if let Some(cart) = self.write().carts.iter_mut().find(|c| c.id == cart_id) {
            cart.total_price = total.clone();
        }
        Ok(())
    }

    fn cart_items(&mut self, cart_id: Uuid) -> Result<Vec<CartItem>, DomainError> {
        Ok(self
            .tables
            .cart_items
            .iter()
            .filter(|i| i.cart_id == cart_id)
            .cloned()
            .collect())
    }

    fn insert_cart_item(&mut self, item: &CartItem) -> Result<(), DomainError> {
        let duplicate = self
            .tables
            .cart_items
            .iter()
            .any(|i| i.cart_id == item.cart_id && i.product_id == item.product_id);
        if duplicate {
            return Err(DomainError::Internal(format!(
                "cart {} already holds product {}",
                item.cart_id, item.product_id
            )));
        }
        self.write().cart_items.push(item.clone());
        Ok(())
    }

    fn update_cart_item_quantity(
        &mut self,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<(), DomainError> {
        if let Some(item) = self.write().cart_items.iter_mut().find(|i| i.id == item_id) {
            item.quantity = quantity;
        }
        Ok(())
    }

    fn delete_cart_item(&mut self, item_id: Uuid) -> Result<(), DomainError> {
        self.write().cart_items.retain(|i| i.id != item_id);
        Ok(())
    }

    fn clear_cart_items(&mut self, cart_id: Uuid) -> Result<usize, DomainError> {
        let before = self.tables.cart_items.len();
        self.write().cart_items.retain(|i| i.cart_id != cart_id);
        Ok(before - self.tables.cart_items.len())
    }

    fn find_product(&mut self, product_id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.tables.products.get(&product_id).cloned())
    }

    fn insert_product(&mut self, product: &Product) -> Result<(), DomainError> {
        self.write().products.insert(product.id, product.clone());
        Ok(())
    }

    fn update_product(&mut self, product: &Product) -> Result<bool, DomainError> {
        match self.write().products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn decrement_stock_if_available(
        &mut self,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<bool, DomainError> {
        match self.write().products.get_mut(&product_id) {
            Some(product) if product.quantity >= quantity => {
                product.quantity -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn find_address(&mut self, address_id: Uuid) -> Result<Option<Address>, DomainError> {
        Ok(self.tables.addresses.get(&address_id).cloned())
    }

    fn insert_address(&mut self, address: &Address) -> Result<(), DomainError> {
        self.write().addresses.insert(address.id, address.clone());
        Ok(())
    }

    fn insert_payment(&mut self, payment: &Payment) -> Result<(), DomainError> {
        self.write().payments.insert(payment.id, payment.clone());
        Ok(())
    }

    fn insert_order(&mut self, order: &OrderRecord) -> Result<(), DomainError> {
        self.write().orders.push(order.clone());
        Ok(())
    }

    fn insert_order_items(&mut self, items: &[OrderItem]) -> Result<(), DomainError> {
        self.write().order_items.extend_from_slice(items);
        Ok(())
    }

    fn find_order(&mut self, order_id: Uuid) -> Result<Option<OrderRecord>, DomainError> {
        Ok(self.tables.orders.iter().find(|o| o.id == order_id).cloned())
    }

    fn order_items(&mut self, order_id: Uuid) -> Result<Vec<OrderItem>, DomainError> {
        Ok(self
            .tables
            .order_items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    fn find_payment(&mut self, payment_id: Uuid) -> Result<Option<Payment>, DomainError> {
        Ok(self.tables.payments.get(&payment_id).cloned())
    }

    fn list_orders_by_owner(
        &mut self,
        owner_email: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderRecord>, DomainError> {
        let mut owned: Vec<OrderRecord> = self
            .tables
            .orders
            .iter()
            .filter(|o| o.owner_email == owner_email)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(owned.into_iter().skip(offset).take(limit).collect())
    }

    fn count_orders_by_owner(&mut self, owner_email: &str) -> Result<i64, DomainError> {
        let count = self
            .tables
            .orders
            .iter()
            .filter(|o| o.owner_email == owner_email)
            .count();
        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Mouse".to_string(),
            quantity,
            price: BigDecimal::from(20),
            discount_percent: BigDecimal::from(0),
            special_price: BigDecimal::from(20),
        }
    }

    #[test]
    fn failed_unit_of_work_discards_its_writes() {
        let store = MemoryStore::new();
        let p = product(3);
        store
            .transaction(|tx| tx.insert_product(&p))
            .expect("insert failed");

        let result: Result<(), DomainError> = store.transaction(|tx| {
            assert!(tx.decrement_stock_if_available(p.id, 2)?);
            Err(DomainError::EmptyCart)
        });
        assert!(result.is_err());

        let stock = store
            .transaction(|tx| tx.find_product(p.id))
            .expect("find failed")
            .expect("product should exist")
            .quantity;
        assert_eq!(stock, 3);
    }

    #[test]
    fn panicking_unit_of_work_discards_its_writes() {
        let store = MemoryStore::new();
        let p = product(3);

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.transaction::<(), _>(|tx| {
                tx.insert_product(&p)?;
                panic!("work failed midway");
            })
        }));
        assert!(outcome.is_err());

        let found = store
            .transaction(|tx| tx.find_product(p.id))
            .expect("find failed");
        assert!(found.is_none());
    }

    #[test]
    fn read_only_unit_of_work_leaves_tables_alone() {
        let store = MemoryStore::new();
        let p = product(3);
        store
            .transaction(|tx| tx.insert_product(&p))
            .expect("insert failed");

        let result: Result<(), DomainError> = store.transaction(|tx| {
            tx.find_product(p.id)?;
            Err(DomainError::EmptyCart)
        });
        assert!(result.is_err());

        let found = store
            .transaction(|tx| tx.find_product(p.id))
            .expect("find failed");
        assert_eq!(found, Some(p));
    }

    #[test]
    fn decrement_refuses_more_than_stock() {
        let store = MemoryStore::new();
        let p = product(1);
        let (first, second) = store
            .transaction(|tx| {
                tx.insert_product(&p)?;
                Ok((
                    tx.decrement_stock_if_available(p.id, 2)?,
                    tx.decrement_stock_if_available(p.id, 1)?,
                ))
            })
            .expect("transaction failed");
        assert!(!first);
        assert!(second);
    }

    #[test]
    fn cart_insert_is_once_per_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let (a, b) = store
            .transaction(|tx| {
                Ok((
                    tx.insert_cart_if_absent(&CartRecord::empty(owner))?,
                    tx.insert_cart_if_absent(&CartRecord::empty(owner))?,
                ))
            })
            .expect("transaction failed");
        assert!(a);
        assert!(!b);
    }
}
