use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::Services;
use crate::domain::order::{Order, OrderItem, Payment, PaymentDetails};
use crate::domain::ports::Store;
use crate::errors::AppError;

use super::identity::Caller;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub address_id: Uuid,
    /// e.g. "CARD" or "COD"
    pub payment_method: String,
    #[serde(default)]
    pub gateway_payment_id: String,
    #[serde(default)]
    pub gateway_status: String,
    #[serde(default)]
    pub gateway_message: String,
    #[serde(default)]
    pub gateway_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub payment_method: String,
    pub gateway_payment_id: String,
    pub gateway_status: String,
    pub gateway_message: String,
    pub gateway_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub discount: String,
    /// Unit price at order time times quantity, e.g. "3600.00"
    pub ordered_product_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub owner_email: String,
    pub items: Vec<OrderItemResponse>,
    pub order_date: String,
    pub total_amount: String,
    pub status: String,
    pub address_id: Uuid,
    pub payment: PaymentResponse,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            payment_method: p.method,
            gateway_payment_id: p.gateway_payment_id,
            gateway_status: p.gateway_status,
            gateway_message: p.gateway_message,
            gateway_name: p.gateway_name,
        }
    }
}

impl From<OrderItem> for OrderItemResponse {
    fn from(i: OrderItem) -> Self {
        Self {
            id: i.id,
            product_id: i.product_id,
            quantity: i.quantity,
            discount: i.discount.to_string(),
            ordered_product_price: i.ordered_product_price.to_string(),
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            owner_email: o.owner_email,
            items: o.items.into_iter().map(OrderItemResponse::from).collect(),
            order_date: o.order_date.to_rfc3339(),
            total_amount: o.total_amount.to_string(),
            status: o.status.to_string(),
            address_id: o.address_id,
            payment: PaymentResponse::from(o.payment),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/users/orders
///
/// Checks out the caller's cart. Payment, order, order items, stock
/// reservations and the cart clear commit together or not at all.
#[utoipa::path(
    post,
    path = "/api/users/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Cart is empty or stock is insufficient"),
        (status = 401, description = "Caller is not authenticated"),
        (status = 404, description = "Cart or address not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn place_order<S: Store>(
    services: web::Data<Services<S>>,
    caller: Caller,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let owner = caller.0;
    let payment = PaymentDetails {
        method: body.payment_method,
        gateway_payment_id: body.gateway_payment_id,
        gateway_status: body.gateway_status,
        gateway_message: body.gateway_message,
        gateway_name: body.gateway_name,
    };
    let address_id = body.address_id;

    let order = web::block(move || services.orders.place_order(&owner, address_id, payment))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /api/users/orders/{id}
#[utoipa::path(
    get,
    path = "/api/users/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Caller is not authenticated"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order<S: Store>(
    services: web::Data<Services<S>>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let owner = caller.0;

    let order = web::block(move || services.orders.get_order(&owner, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /api/users/orders
///
/// Returns the caller's orders, newest first.
/// Use `page` (1-based) and `limit` to control pagination.
#[utoipa::path(
    get,
    path = "/api/users/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 401, description = "Caller is not authenticated"),
    ),
    tag = "orders"
)]
pub async fn list_orders<S: Store>(
    services: web::Data<Services<S>>,
    caller: Caller,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let owner = caller.0;

    let result = web::block(move || {
        services
            .orders
            .list_orders(&owner, params.page, params.limit)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page: result.page,
        limit: result.limit,
    }))
}
