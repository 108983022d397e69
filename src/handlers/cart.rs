use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::Services;
use crate::domain::cart::{Cart, CartItem, QuantityStep};
use crate::domain::ports::Store;
use crate::errors::AppError;

use super::identity::Caller;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price captured when the product was added, e.g. "1800.00"
    pub price_at_add: String,
    pub discount_at_add: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub items: Vec<CartItemResponse>,
    pub total_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveItemResponse {
    pub message: String,
    pub cart: CartResponse,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            price_at_add: item.price_at_add.to_string(),
            discount_at_add: item.discount_at_add.to_string(),
        }
    }
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id,
            owner_id: cart.owner_id,
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            total_price: cart.total_price.to_string(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/carts/products/{product_id}/quantity/{quantity}
///
/// Adds a product to the caller's cart, creating the cart on first use.
#[utoipa::path(
    post,
    path = "/api/carts/products/{product_id}/quantity/{quantity}",
    params(
        ("product_id" = Uuid, Path, description = "Product UUID"),
        ("quantity" = i32, Path, description = "Units to add"),
    ),
    responses(
        (status = 201, description = "Product added to cart", body = CartResponse),
        (status = 400, description = "Out of stock, insufficient stock or already in cart"),
        (status = 401, description = "Caller is not authenticated"),
        (status = 404, description = "Product not found"),
    ),
    tag = "carts"
)]
pub async fn add_item<S: Store>(
    services: web::Data<Services<S>>,
    caller: Caller,
    path: web::Path<(Uuid, i32)>,
) -> Result<HttpResponse, AppError> {
    let (product_id, quantity) = path.into_inner();
    let owner_id = caller.0.id;

    let cart = web::block(move || services.carts.add_item(owner_id, product_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CartResponse::from(cart)))
}

/// GET /api/carts/users/cart
#[utoipa::path(
    get,
    path = "/api/carts/users/cart",
    responses(
        (status = 200, description = "The caller's cart", body = CartResponse),
        (status = 401, description = "Caller is not authenticated"),
        (status = 404, description = "Caller has no cart"),
    ),
    tag = "carts"
)]
pub async fn get_cart<S: Store>(
    services: web::Data<Services<S>>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let owner_id = caller.0.id;

    let cart = web::block(move || services.carts.get_cart(owner_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// GET /api/carts
///
/// Lists every cart in the store.
#[utoipa::path(
    get,
    path = "/api/carts",
    responses(
        (status = 200, description = "All carts", body = [CartResponse]),
        (status = 401, description = "Caller is not authenticated"),
    ),
    tag = "carts"
)]
pub async fn list_carts<S: Store>(
    services: web::Data<Services<S>>,
    _caller: Caller,
) -> Result<HttpResponse, AppError> {
    let carts = web::block(move || services.carts.list_carts())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<CartResponse> = carts.into_iter().map(CartResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PUT /api/cart/products/{product_id}/quantity/{operation}
///
/// `delete` lowers the quantity by one; any other operation raises it by one.
#[utoipa::path(
    put,
    path = "/api/cart/products/{product_id}/quantity/{operation}",
    params(
        ("product_id" = Uuid, Path, description = "Product UUID"),
        ("operation" = String, Path, description = "'delete' to decrement, anything else to increment"),
    ),
    responses(
        (status = 200, description = "Quantity updated", body = CartResponse),
        (status = 400, description = "Not enough stock for the increment"),
        (status = 401, description = "Caller is not authenticated"),
        (status = 404, description = "Cart or cart item not found"),
    ),
    tag = "carts"
)]
pub async fn update_item_quantity<S: Store>(
    services: web::Data<Services<S>>,
    caller: Caller,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, AppError> {
    let (product_id, operation) = path.into_inner();
    let step = QuantityStep::from_operation(&operation);
    let owner_id = caller.0.id;

    let cart = web::block(move || {
        services
            .carts
            .update_item_quantity(owner_id, product_id, step)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// DELETE /api/carts/{cart_id}/product/{product_id}
///
/// Only the cart's owner may remove its lines; other callers get 404.
#[utoipa::path(
    delete,
    path = "/api/carts/{cart_id}/product/{product_id}",
    params(
        ("cart_id" = Uuid, Path, description = "Cart UUID"),
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product removed", body = RemoveItemResponse),
        (status = 401, description = "Caller is not authenticated"),
        (status = 404, description = "Cart or cart item not found"),
    ),
    tag = "carts"
)]
pub async fn remove_item<S: Store>(
    services: web::Data<Services<S>>,
    caller: Caller,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (cart_id, product_id) = path.into_inner();
    let owner_id = caller.0.id;

    let cart = web::block(move || {
        services
            .carts
            .remove_item_from_cart(owner_id, cart_id, product_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(RemoveItemResponse {
        message: format!("Product {} removed from the cart", product_id),
        cart: CartResponse::from(cart),
    }))
}
