use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { .. } | DomainError::ItemNotFound { .. } => {
                AppError::NotFound(e.to_string())
            }
            DomainError::Duplicate { .. }
            | DomainError::OutOfStock { .. }
            | DomainError::InsufficientStock { .. }
            | DomainError::EmptyCart
            | DomainError::Validation { .. } => AppError::BadRequest(e.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(detail) => {
                log::error!("Request failed: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::Entity;
    use actix_web::ResponseError;
    use uuid::Uuid;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("Cart not found".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unauthorized_returns_401() {
        let err = AppError::Unauthorized("missing identity".to_string());
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::not_found(Entity::Address, Uuid::nil()).into();
        assert!(matches!(app_err, AppError::NotFound(_)));
    }

    #[test]
    fn domain_item_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::ItemNotFound {
            product_id: Uuid::nil(),
        }
        .into();
        assert!(matches!(app_err, AppError::NotFound(_)));
    }

    #[test]
    fn business_rule_violations_map_to_bad_request() {
        let cases = [
            DomainError::Duplicate {
                product: "Phone".to_string(),
            },
            DomainError::OutOfStock {
                product: "Phone".to_string(),
            },
            DomainError::InsufficientStock {
                product: "Phone".to_string(),
                requested: 3,
                available: 1,
            },
            DomainError::EmptyCart,
            DomainError::validation("quantity", "must be greater than zero"),
        ];
        for err in cases {
            let app_err: AppError = err.into();
            assert!(matches!(app_err, AppError::BadRequest(_)));
        }
    }

    #[test]
    fn bad_request_keeps_domain_message() {
        let app_err: AppError = DomainError::EmptyCart.into();
        assert_eq!(app_err.to_string(), "Cart is empty");
    }

    #[test]
    fn domain_internal_maps_to_app_internal() {
        let app_err: AppError = DomainError::Internal("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
