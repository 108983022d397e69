use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::Services;
use crate::domain::errors::DomainError;
use crate::domain::ports::Store;
use crate::domain::product::{Product, ProductInput};
use crate::errors::AppError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub quantity: i32,
    /// Decimal string, e.g. "2000.00"
    pub price: String,
    /// Percentage between 0 and 100, e.g. "10"
    #[serde(default = "default_discount")]
    pub discount_percent: String,
}

fn default_discount() -> String {
    "0".to_string()
}

impl ProductRequest {
    fn into_input(self) -> Result<ProductInput, DomainError> {
        let price = BigDecimal::from_str(self.price.trim())
            .map_err(|_| DomainError::validation("price", "must be a decimal number"))?;
        let discount_percent = BigDecimal::from_str(self.discount_percent.trim())
            .map_err(|_| DomainError::validation("discount_percent", "must be a decimal number"))?;
        Ok(ProductInput {
            name: self.name,
            quantity: self.quantity,
            price,
            discount_percent,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: String,
    pub discount_percent: String,
    /// `price` less the discount, rounded to cents
    pub special_price: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            quantity: p.quantity,
            price: p.price.to_string(),
            discount_percent: p.discount_percent.to_string(),
            special_price: p.special_price.to_string(),
        }
    }
}

/// POST /api/admin/products
#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product fields"),
    ),
    tag = "products"
)]
pub async fn create_product<S: Store>(
    services: web::Data<Services<S>>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;

    let product = web::block(move || services.catalog.create_product(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// PUT /api/admin/products/{id}
///
/// Replaces the product's fields and recomputes its special price. Cart
/// lines keep the price captured when they were added.
#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    request_body = ProductRequest,
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid product fields"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn update_product<S: Store>(
    services: web::Data<Services<S>>,
    path: web::Path<Uuid>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let product = web::block(move || services.catalog.update_product(id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product<S: Store>(
    services: web::Data<Services<S>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let product = web::block(move || services.catalog.get_product(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}
