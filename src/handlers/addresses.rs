use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::Services;
use crate::domain::ports::Store;
use crate::domain::product::{Address, AddressInput};
use crate::errors::AppError;

use super::identity::Caller;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddressRequest {
    pub street: String,
    pub building_name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,
}

impl From<AddressRequest> for AddressInput {
    fn from(r: AddressRequest) -> Self {
        Self {
            street: r.street,
            building_name: r.building_name,
            city: r.city,
            state: r.state,
            country: r.country,
            zipcode: r.zipcode,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub id: Uuid,
    pub street: String,
    pub building_name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,
}

impl From<Address> for AddressResponse {
    fn from(a: Address) -> Self {
        Self {
            id: a.id,
            street: a.street,
            building_name: a.building_name,
            city: a.city,
            state: a.state,
            country: a.country,
            zipcode: a.zipcode,
        }
    }
}

/// POST /api/addresses
#[utoipa::path(
    post,
    path = "/api/addresses",
    request_body = AddressRequest,
    responses(
        (status = 201, description = "Address created", body = AddressResponse),
        (status = 400, description = "Invalid address fields"),
        (status = 401, description = "Caller is not authenticated"),
    ),
    tag = "addresses"
)]
pub async fn create_address<S: Store>(
    services: web::Data<Services<S>>,
    _caller: Caller,
    body: web::Json<AddressRequest>,
) -> Result<HttpResponse, AppError> {
    let input = AddressInput::from(body.into_inner());

    let address = web::block(move || services.addresses.create_address(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(AddressResponse::from(address)))
}

/// GET /api/addresses/{id}
#[utoipa::path(
    get,
    path = "/api/addresses/{id}",
    params(
        ("id" = Uuid, Path, description = "Address UUID"),
    ),
    responses(
        (status = 200, description = "Address found", body = AddressResponse),
        (status = 401, description = "Caller is not authenticated"),
        (status = 404, description = "Address not found"),
    ),
    tag = "addresses"
)]
pub async fn get_address<S: Store>(
    services: web::Data<Services<S>>,
    _caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let address = web::block(move || services.addresses.get_address(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(AddressResponse::from(address)))
}
