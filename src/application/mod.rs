pub mod address_service;
pub mod cart_service;
pub mod catalog_service;
pub mod inventory;
pub mod order_service;

use crate::domain::ports::Store;

pub use address_service::AddressService;
pub use cart_service::CartService;
pub use catalog_service::CatalogService;
pub use order_service::OrderService;

/// Every service, sharing one store. Handed to the transport layer as
/// application state.
pub struct Services<S> {
    pub carts: CartService<S>,
    pub orders: OrderService<S>,
    pub catalog: CatalogService<S>,
    pub addresses: AddressService<S>,
}

impl<S: Store + Clone> Services<S> {
    pub fn new(store: S) -> Self {
        Self {
            carts: CartService::new(store.clone()),
            orders: OrderService::new(store.clone()),
            catalog: CatalogService::new(store.clone()),
            addresses: AddressService::new(store),
        }
    }
}
