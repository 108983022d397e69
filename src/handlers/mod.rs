pub mod addresses;
pub mod cart;
pub mod identity;
pub mod orders;
pub mod products;

use actix_web::web;
use utoipa::OpenApi;

use crate::domain::ports::Store;

/// Registers every storefront route under `/api` for a given store.
pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/carts", web::get().to(cart::list_carts::<S>))
            .route("/carts/users/cart", web::get().to(cart::get_cart::<S>))
            .route(
                "/carts/products/{product_id}/quantity/{quantity}",
                web::post().to(cart::add_item::<S>),
            )
            .route(
                "/carts/{cart_id}/product/{product_id}",
                web::delete().to(cart::remove_item::<S>),
            )
            .route(
                "/cart/products/{product_id}/quantity/{operation}",
                web::put().to(cart::update_item_quantity::<S>),
            )
            .route("/users/orders", web::post().to(orders::place_order::<S>))
            .route("/users/orders", web::get().to(orders::list_orders::<S>))
            .route("/users/orders/{id}", web::get().to(orders::get_order::<S>))
            .route("/admin/products", web::post().to(products::create_product::<S>))
            .route(
                "/admin/products/{id}",
                web::put().to(products::update_product::<S>),
            )
            .route("/products/{id}", web::get().to(products::get_product::<S>))
            .route("/addresses", web::post().to(addresses::create_address::<S>))
            .route("/addresses/{id}", web::get().to(addresses::get_address::<S>)),
    );
}

#[derive(OpenApi)]
#[openapi(
    paths(
        cart::add_item,
        cart::get_cart,
        cart::list_carts,
        cart::update_item_quantity,
        cart::remove_item,
        orders::place_order,
        orders::get_order,
        orders::list_orders,
        products::create_product,
        products::update_product,
        products::get_product,
        addresses::create_address,
        addresses::get_address,
    ),
    components(schemas(
        cart::CartItemResponse,
        cart::CartResponse,
        cart::RemoveItemResponse,
        orders::PlaceOrderRequest,
        orders::OrderResponse,
        orders::OrderItemResponse,
        orders::PaymentResponse,
        orders::ListOrdersResponse,
        products::ProductRequest,
        products::ProductResponse,
        addresses::AddressRequest,
        addresses::AddressResponse,
    )),
    tags(
        (name = "carts", description = "Shopping cart operations"),
        (name = "orders", description = "Checkout and order history"),
        (name = "products", description = "Catalog administration"),
        (name = "addresses", description = "Shipping addresses"),
    )
)]
pub struct ApiDoc;
