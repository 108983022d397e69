use log::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, Entity};
use crate::domain::ports::Store;
use crate::domain::product::{Product, ProductInput};

/// Product persistence. The sellable price is derived on every write and
/// never accepted from the caller.
pub struct CatalogService<S> {
    store: S,
}

impl<S: Store> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_product(&self, input: ProductInput) -> Result<Product, DomainError> {
        input.validate()?;
        let product = input.into_product(Uuid::new_v4());
        self.store.transaction(|tx| tx.insert_product(&product))?;

        info!(
            "Created product {} ({}) at special price {}",
            product.id, product.name, product.special_price
        );
        Ok(product)
    }

    /// Replaces a product's fields. Existing cart and order snapshots keep
    /// the prices they were taken at.
    pub fn update_product(&self, id: Uuid, input: ProductInput) -> Result<Product, DomainError> {
        input.validate()?;
        let product = input.into_product(id);
        let updated = self.store.transaction(|tx| tx.update_product(&product))?;
        if !updated {
            return Err(DomainError::not_found(Entity::Product, id));
        }

        info!(
            "Updated product {} to price {} less {}%",
            product.id, product.price, product.discount_percent
        );
        Ok(product)
    }

    pub fn get_product(&self, id: Uuid) -> Result<Product, DomainError> {
        self.store
            .transaction(|tx| tx.find_product(id))?
            .ok_or_else(|| DomainError::not_found(Entity::Product, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures::dec;
    use crate::infrastructure::MemoryStore;

    fn input(price: &str, discount: &str) -> ProductInput {
        ProductInput {
            name: "Mechanical Keyboard".to_string(),
            quantity: 12,
            price: dec(price),
            discount_percent: dec(discount),
        }
    }

    #[test]
    fn create_derives_and_persists_special_price() {
        let catalog = CatalogService::new(MemoryStore::new());
        let created = catalog.create_product(input("2000", "10")).expect("create failed");
        assert_eq!(created.special_price, dec("1800"));

        let fetched = catalog.get_product(created.id).expect("get failed");
        assert_eq!(fetched, created);
    }

    #[test]
    fn update_rederives_special_price() {
        let catalog = CatalogService::new(MemoryStore::new());
        let created = catalog.create_product(input("2000", "10")).expect("create failed");

        let updated = catalog
            .update_product(created.id, input("2000", "25"))
            .expect("update failed");
        assert_eq!(updated.special_price, dec("1500"));
        assert_eq!(
            catalog.get_product(created.id).expect("get failed").special_price,
            dec("1500")
        );
    }

    #[test]
    fn update_unknown_product_is_not_found() {
        let catalog = CatalogService::new(MemoryStore::new());
        let err = catalog
            .update_product(Uuid::new_v4(), input("1", "0"))
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: Entity::Product,
                ..
            }
        ));
    }

    #[test]
    fn invalid_discount_is_rejected_before_storage() {
        let catalog = CatalogService::new(MemoryStore::new());
        let err = catalog.create_product(input("10", "120")).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
