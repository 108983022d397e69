use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::{CartItem, CartRecord};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderItem, OrderRecord, Payment};
use crate::domain::ports::{Store, StoreTx};
use crate::domain::product::{Address, Product};
use crate::schema::{addresses, cart_items, carts, order_items, orders, payments, products};

use super::models::{
    AddressRow, CartItemRow, CartRow, OrderItemRow, OrderRow, PaymentRow, ProductRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Store ────────────────────────────────────────────────────────────────────

/// PostgreSQL-backed store. Each unit of work is one database transaction on
/// a pooled connection.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Store for PgStore {
    fn transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>,
    {
        let mut pooled = self.pool.get()?;
        let conn: &mut PgConnection = &mut pooled;

        conn.transaction::<_, DomainError, _>(|conn| work(&mut PgTx { conn }))
    }
}

struct PgTx<'c> {
    conn: &'c mut PgConnection,
}

impl StoreTx for PgTx<'_> {
    fn insert_cart_if_absent(&mut self, cart: &CartRecord) -> Result<bool, DomainError> {
        // Concurrent first-time calls for one owner race on the unique index;
        // the loser waits for the winner's commit and writes nothing.
        let written = diesel::insert_into(carts::table)
            .values(&CartRow::from(cart))
            .on_conflict(carts::owner_id)
            .do_nothing()
            .execute(self.conn)?;
        Ok(written == 1)
    }

    fn lock_cart_by_owner(&mut self, owner_id: Uuid) -> Result<Option<CartRecord>, DomainError> {
        let row = carts::table
            .filter(carts::owner_id.eq(owner_id))
            .select(CartRow::as_select())
            .for_update()
            .first(self.conn)
            .optional()?;
        Ok(row.map(CartRecord::from))
    }

    fn lock_cart(&mut self, cart_id: Uuid) -> Result<Option<CartRecord>, DomainError> {
        let row = carts::table
            .filter(carts::id.eq(cart_id))
            .select(CartRow::as_select())
            .for_update()
            .first(self.conn)
            .optional()?;
        Ok(row.map(CartRecord::from))
    }

    fn find_cart_by_owner(&mut self, owner_id: Uuid) -> Result<Option<CartRecord>, DomainError> {
        let row = carts::table
            .filter(carts::owner_id.eq(owner_id))
            .select(CartRow::as_select())
            .first(self.conn)
            .optional()?;
        Ok(row.map(CartRecord::from))
    }

    fn list_carts(&mut self) -> Result<Vec<CartRecord>, DomainError> {
        let rows = carts::table
            .select(CartRow::as_select())
            .order(carts::created_at.asc())
            .load(self.conn)?;
        Ok(rows.into_iter().map(CartRecord::from).collect())
    }

    fn set_cart_total(&mut self, cart_id: Uuid, total: &BigDecimal) -> Result<(), DomainError> {
        diesel::update(carts::table.filter(carts::id.eq(cart_id)))
            .set((
                carts::total_price.eq(total),
                carts::updated_at.eq(Utc::now()),
            ))
            .execute(self.conn)?;
        Ok(())
    }

    fn cart_items(&mut self, cart_id: Uuid) -> Result<Vec<CartItem>, DomainError> {
        let rows = cart_items::table
            .filter(cart_items::cart_id.eq(cart_id))
            .select(CartItemRow::as_select())
            .order(cart_items::created_at.asc())
            .load(self.conn)?;
        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    fn insert_cart_item(&mut self, item: &CartItem) -> Result<(), DomainError> {
        diesel::insert_into(cart_items::table)
            .values(&CartItemRow::from(item))
            .execute(self.conn)?;
        Ok(())
    }

    fn update_cart_item_quantity(
        &mut self,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<(), DomainError> {
        diesel::update(cart_items::table.filter(cart_items::id.eq(item_id)))
            .set(cart_items::quantity.eq(quantity))
            .execute(self.conn)?;
        Ok(())
    }

    fn delete_cart_item(&mut self, item_id: Uuid) -> Result<(), DomainError> {
        diesel::delete(cart_items::table.filter(cart_items::id.eq(item_id)))
            .execute(self.conn)?;
        Ok(())
    }

    fn clear_cart_items(&mut self, cart_id: Uuid) -> Result<usize, DomainError> {
        let deleted = diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart_id)))
            .execute(self.conn)?;
        Ok(deleted)
    }

    fn find_product(&mut self, product_id: Uuid) -> Result<Option<Product>, DomainError> {
        let row = products::table
            .filter(products::id.eq(product_id))
            .select(ProductRow::as_select())
            .for_share()
            .first(self.conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn insert_product(&mut self, product: &Product) -> Result<(), DomainError> {
        diesel::insert_into(products::table)
            .values(&ProductRow::from(product))
            .execute(self.conn)?;
        Ok(())
    }

    fn update_product(&mut self, product: &Product) -> Result<bool, DomainError> {
        let updated = diesel::update(products::table.filter(products::id.eq(product.id)))
            .set((
                products::name.eq(&product.name),
                products::quantity.eq(product.quantity),
                products::price.eq(&product.price),
                products::discount_percent.eq(&product.discount_percent),
                products::special_price.eq(&product.special_price),
                products::updated_at.eq(Utc::now()),
            ))
            .execute(self.conn)?;
        Ok(updated == 1)
    }

    fn decrement_stock_if_available(
        &mut self,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<bool, DomainError> {
        // Check and decrement in one statement; the row lock taken by UPDATE
        // serialises concurrent reservations of the same product.
        let updated = diesel::update(
            products::table
                .filter(products::id.eq(product_id))
                .filter(products::quantity.ge(quantity)),
        )
        .set((
            products::quantity.eq(products::quantity - quantity),
            products::updated_at.eq(Utc::now()),
        ))
        .execute(self.conn)?;
        Ok(updated == 1)
    }

    fn find_address(&mut self, address_id: Uuid) -> Result<Option<Address>, DomainError> {
        let row = addresses::table
            .filter(addresses::id.eq(address_id))
            .select(AddressRow::as_select())
            .first(self.conn)
            .optional()?;
        Ok(row.map(Address::from))
    }

    fn insert_address(&mut self, address: &Address) -> Result<(), DomainError> {
        diesel::insert_into(addresses::table)
            .values(&AddressRow::from(address))
            .execute(self.conn)?;
        Ok(())
    }

    fn insert_payment(&mut self, payment: &Payment) -> Result<(), DomainError> {
        diesel::insert_into(payments::table)
            .values(&PaymentRow::from(payment))
            .execute(self.conn)?;
        Ok(())
    }

    fn insert_order(&mut self, order: &OrderRecord) -> Result<(), DomainError> {
        diesel::insert_into(orders::table)
            .values(&OrderRow::from(order))
            .execute(self.conn)?;
        Ok(())
    }

    fn insert_order_items(&mut self, items: &[OrderItem]) -> Result<(), DomainError> {
        if items.is_empty() {
            return Ok(());
        }
        let rows: Vec<OrderItemRow> = items.iter().map(OrderItemRow::from).collect();
        diesel::insert_into(order_items::table)
            .values(&rows)
            .execute(self.conn)?;
        Ok(())
    }

    fn find_order(&mut self, order_id: Uuid) -> Result<Option<OrderRecord>, DomainError> {
        let row = orders::table
            .filter(orders::id.eq(order_id))
            .select(OrderRow::as_select())
            .first(self.conn)
            .optional()?;
        row.map(OrderRecord::try_from).transpose()
    }

    fn order_items(&mut self, order_id: Uuid) -> Result<Vec<OrderItem>, DomainError> {
        let rows = order_items::table
            .filter(order_items::order_id.eq(order_id))
            .select(OrderItemRow::as_select())
            .order(order_items::created_at.asc())
            .load(self.conn)?;
        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    fn find_payment(&mut self, payment_id: Uuid) -> Result<Option<Payment>, DomainError> {
        let row = payments::table
            .filter(payments::id.eq(payment_id))
            .select(PaymentRow::as_select())
            .first(self.conn)
            .optional()?;
        Ok(row.map(Payment::from))
    }

    fn list_orders_by_owner(
        &mut self,
        owner_email: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderRecord>, DomainError> {
        let rows = orders::table
            .filter(orders::owner_email.eq(owner_email))
            .select(OrderRow::as_select())
            .order(orders::order_date.desc())
            .limit(limit)
            .offset(offset)
            .load(self.conn)?;
        rows.into_iter().map(OrderRecord::try_from).collect()
    }

    fn count_orders_by_owner(&mut self, owner_email: &str) -> Result<i64, DomainError> {
        let total = orders::table
            .filter(orders::owner_email.eq(owner_email))
            .count()
            .get_result(self.conn)?;
        Ok(total)
    }
}
