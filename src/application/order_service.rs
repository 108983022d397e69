use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, Entity};
use crate::domain::order::{
    ListResult, Order, OrderItem, OrderRecord, OrderStatus, Payment, PaymentDetails,
};
use crate::domain::ports::{Store, StoreTx};
use crate::domain::Owner;

use super::{cart_service, inventory};

pub const MAX_PAGE_SIZE: i64 = 100;

/// Converts carts into orders.
pub struct OrderService<S> {
    store: S,
}

impl<S: Store> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Checks out the owner's cart.
    ///
    /// Payment, order, order items, stock reservations and the cart clear are
    /// written in a single unit of work: if any line cannot be reserved, no
    /// stock moves for any line and nothing is persisted.
    pub fn place_order(
        &self,
        owner: &Owner,
        address_id: Uuid,
        payment: PaymentDetails,
    ) -> Result<Order, DomainError> {
        payment.validate()?;

        let order = self.store.transaction(|tx| {
            let mut cart = cart_service::lock_owner_cart(tx, owner.id)?
                .ok_or_else(|| DomainError::not_found(Entity::Cart, owner.id))?;
            let mut cart_items = tx.cart_items(cart.id)?;
            if cart_items.is_empty() {
                return Err(DomainError::EmptyCart);
            }
            let address = tx
                .find_address(address_id)?
                .ok_or_else(|| DomainError::not_found(Entity::Address, address_id))?;

            let payment = Payment::from_details(Uuid::new_v4(), payment);
            tx.insert_payment(&payment)?;

            let record = OrderRecord {
                id: Uuid::new_v4(),
                owner_email: owner.email.clone(),
                order_date: Utc::now(),
                total_amount: cart.total_price.clone(),
                status: OrderStatus::Accepted,
                address_id: address.id,
                payment_id: payment.id,
            };
            tx.insert_order(&record)?;

            // Product rows are locked in id order so concurrent checkouts of
            // overlapping carts cannot wait on each other in a cycle.
            cart_items.sort_by_key(|line| line.product_id);

            let mut items = Vec::with_capacity(cart_items.len());
            for line in &cart_items {
                items.push(OrderItem {
                    id: Uuid::new_v4(),
                    order_id: record.id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    discount: line.discount_at_add.clone(),
                    ordered_product_price: line.contribution(),
                });
                inventory::reserve_stock(tx, line.product_id, line.quantity)?;
            }
            tx.insert_order_items(&items)?;
            cart_service::clear_cart(tx, &mut cart)?;

            Ok(Order::assemble(record, items, payment))
        })?;

        info!(
            "Order {} placed by {} with {} item(s) totalling {}",
            order.id,
            order.owner_email,
            order.items.len(),
            order.total_amount
        );
        Ok(order)
    }

    /// Fetches one of the owner's orders. Orders of other owners are reported
    /// as missing.
    pub fn get_order(&self, owner: &Owner, order_id: Uuid) -> Result<Order, DomainError> {
        self.store.transaction(|tx| {
            let record = tx
                .find_order(order_id)?
                .filter(|o| o.owner_email == owner.email)
                .ok_or_else(|| DomainError::not_found(Entity::Order, order_id))?;
            load_order(tx, record)
        })
    }

    /// Owner's orders, newest first. `page` is 1-based.
    pub fn list_orders(
        &self,
        owner: &Owner,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1).saturating_mul(limit);

        self.store.transaction(|tx| {
            let total = tx.count_orders_by_owner(&owner.email)?;
            let records = tx.list_orders_by_owner(&owner.email, limit, offset)?;
            let items = records
                .into_iter()
                .map(|record| load_order(tx, record))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ListResult {
                items,
                total,
                page,
                limit,
            })
        })
    }
}

fn load_order(tx: &mut dyn StoreTx, record: OrderRecord) -> Result<Order, DomainError> {
    let items = tx.order_items(record.id)?;
    let payment = tx.find_payment(record.payment_id)?.ok_or_else(|| {
        DomainError::Internal(format!(
            "payment {} of order {} is missing",
            record.payment_id, record.id
        ))
    })?;
    Ok(Order::assemble(record, items, payment))
}
