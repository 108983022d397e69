use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::cart::{CartItem, CartRecord};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderItem, OrderRecord, Payment};
use crate::domain::product::{Address, Product};
use crate::schema::{addresses, cart_items, carts, order_items, orders, payments, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub discount_percent: BigDecimal,
    pub special_price: BigDecimal,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            price: row.price,
            discount_percent: row.discount_percent,
            special_price: row.special_price,
        }
    }
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        ProductRow {
            id: p.id,
            name: p.name.clone(),
            quantity: p.quantity,
            price: p.price.clone(),
            discount_percent: p.discount_percent.clone(),
            special_price: p.special_price.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AddressRow {
    pub id: Uuid,
    pub street: String,
    pub building_name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Address {
            id: row.id,
            street: row.street,
            building_name: row.building_name,
            city: row.city,
            state: row.state,
            country: row.country,
            zipcode: row.zipcode,
        }
    }
}

impl From<&Address> for AddressRow {
    fn from(a: &Address) -> Self {
        AddressRow {
            id: a.id,
            street: a.street.clone(),
            building_name: a.building_name.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            country: a.country.clone(),
            zipcode: a.zipcode.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = carts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub total_price: BigDecimal,
}

impl From<CartRow> for CartRecord {
    fn from(row: CartRow) -> Self {
        CartRecord {
            id: row.id,
            owner_id: row.owner_id,
            total_price: row.total_price,
        }
    }
}

impl From<&CartRecord> for CartRow {
    fn from(c: &CartRecord) -> Self {
        CartRow {
            id: c.id,
            owner_id: c.owner_id,
            total_price: c.total_price.clone(),
        }
    }
}

#[derive(
    Debug, Clone, Queryable, Selectable, Identifiable, Insertable, Associations,
)]
#[diesel(table_name = cart_items)]
#[diesel(belongs_to(CartRow, foreign_key = cart_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItemRow {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price_at_add: BigDecimal,
    pub discount_at_add: BigDecimal,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        CartItem {
            id: row.id,
            cart_id: row.cart_id,
            product_id: row.product_id,
            quantity: row.quantity,
            price_at_add: row.price_at_add,
            discount_at_add: row.discount_at_add,
        }
    }
}

impl From<&CartItem> for CartItemRow {
    fn from(i: &CartItem) -> Self {
        CartItemRow {
            id: i.id,
            cart_id: i.cart_id,
            product_id: i.product_id,
            quantity: i.quantity,
            price_at_add: i.price_at_add.clone(),
            discount_at_add: i.discount_at_add.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub id: Uuid,
    pub method: String,
    pub gateway_payment_id: String,
    pub gateway_status: String,
    pub gateway_message: String,
    pub gateway_name: String,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            id: row.id,
            method: row.method,
            gateway_payment_id: row.gateway_payment_id,
            gateway_status: row.gateway_status,
            gateway_message: row.gateway_message,
            gateway_name: row.gateway_name,
        }
    }
}

impl From<&Payment> for PaymentRow {
    fn from(p: &Payment) -> Self {
        PaymentRow {
            id: p.id,
            method: p.method.clone(),
            gateway_payment_id: p.gateway_payment_id.clone(),
            gateway_status: p.gateway_status.clone(),
            gateway_message: p.gateway_message.clone(),
            gateway_name: p.gateway_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub owner_email: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: BigDecimal,
    pub status: String,
    pub address_id: Uuid,
    pub payment_id: Uuid,
}

impl TryFrom<OrderRow> for OrderRecord {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(OrderRecord {
            id: row.id,
            owner_email: row.owner_email,
            order_date: row.order_date,
            total_amount: row.total_amount,
            status: row.status.parse()?,
            address_id: row.address_id,
            payment_id: row.payment_id,
        })
    }
}

impl From<&OrderRecord> for OrderRow {
    fn from(o: &OrderRecord) -> Self {
        OrderRow {
            id: o.id,
            owner_email: o.owner_email.clone(),
            order_date: o.order_date,
            total_amount: o.total_amount.clone(),
            status: o.status.as_str().to_string(),
            address_id: o.address_id,
            payment_id: o.payment_id,
        }
    }
}

#[derive(
    Debug, Clone, Queryable, Selectable, Identifiable, Insertable, Associations,
)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub discount: BigDecimal,
    pub ordered_product_price: BigDecimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            discount: row.discount,
            ordered_product_price: row.ordered_product_price,
        }
    }
}

impl From<&OrderItem> for OrderItemRow {
    fn from(i: &OrderItem) -> Self {
        OrderItemRow {
            id: i.id,
            order_id: i.order_id,
            product_id: i.product_id,
            quantity: i.quantity,
            discount: i.discount.clone(),
            ordered_product_price: i.ordered_product_price.clone(),
        }
    }
}
