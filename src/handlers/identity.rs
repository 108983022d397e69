use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::Owner;
use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_EMAIL_HEADER: &str = "X-User-Email";

/// The authenticated caller, as resolved by the gateway in front of this
/// service and forwarded in request headers.
#[derive(Debug, Clone)]
pub struct Caller(pub Owner);

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(resolve(req).map(Caller))
    }
}

fn resolve(req: &HttpRequest) -> Result<Owner, AppError> {
    let id = header(req, USER_ID_HEADER)?;
    let id = Uuid::parse_str(id)
        .map_err(|_| AppError::Unauthorized(format!("{} is not a valid id", USER_ID_HEADER)))?;
    let email = header(req, USER_EMAIL_HEADER)?;
    Ok(Owner::new(id, email))
}

fn header<'r>(req: &'r HttpRequest, name: &str) -> Result<&'r str, AppError> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("User is not authenticated: missing {}", name)))
}
