use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

/// Order states. Only `Accepted` is produced today; the rest are reserved
/// for fulfilment transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Accepted,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCEPTED" => Ok(OrderStatus::Accepted),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(
                "status",
                format!("unknown order status '{}'", other),
            )),
        }
    }
}

/// Gateway fields supplied by the caller at checkout.
#[derive(Debug, Clone, Default)]
pub struct PaymentDetails {
    pub method: String,
    pub gateway_payment_id: String,
    pub gateway_status: String,
    pub gateway_message: String,
    pub gateway_name: String,
}

impl PaymentDetails {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.method.trim().is_empty() {
            return Err(DomainError::validation("payment_method", "must not be blank"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: Uuid,
    pub method: String,
    pub gateway_payment_id: String,
    pub gateway_status: String,
    pub gateway_message: String,
    pub gateway_name: String,
}

impl Payment {
    pub fn from_details(id: Uuid, details: PaymentDetails) -> Self {
        Self {
            id,
            method: details.method,
            gateway_payment_id: details.gateway_payment_id,
            gateway_status: details.gateway_status,
            gateway_message: details.gateway_message,
            gateway_name: details.gateway_name,
        }
    }
}

/// Order row without its items or payment.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub id: Uuid,
    pub owner_email: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: BigDecimal,
    pub status: OrderStatus,
    pub address_id: Uuid,
    pub payment_id: Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub discount: BigDecimal,
    /// Unit price at order time multiplied by quantity.
    pub ordered_product_price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub owner_email: String,
    pub items: Vec<OrderItem>,
    pub order_date: DateTime<Utc>,
    pub total_amount: BigDecimal,
    pub status: OrderStatus,
    pub address_id: Uuid,
    pub payment: Payment,
}

impl Order {
    pub fn assemble(record: OrderRecord, items: Vec<OrderItem>, payment: Payment) -> Self {
        Self {
            id: record.id,
            owner_email: record.owner_email,
            items,
            order_date: record.order_date,
            total_amount: record.total_amount,
            status: record.status,
            address_id: record.address_id,
            payment,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Order>,
    pub total: i64,
    /// Page and page size actually applied after clamping.
    pub page: i64,
    pub limit: i64,
}
