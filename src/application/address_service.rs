use uuid::Uuid;

use crate::domain::errors::{DomainError, Entity};
use crate::domain::ports::Store;
use crate::domain::product::{Address, AddressInput};

/// Shipping address persistence used by checkout.
pub struct AddressService<S> {
    store: S,
}

impl<S: Store> AddressService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_address(&self, input: AddressInput) -> Result<Address, DomainError> {
        input.validate()?;
        let address = input.into_address(Uuid::new_v4());
        self.store.transaction(|tx| tx.insert_address(&address))?;
        Ok(address)
    }

    pub fn get_address(&self, id: Uuid) -> Result<Address, DomainError> {
        self.store
            .transaction(|tx| tx.find_address(id))?
            .ok_or_else(|| DomainError::not_found(Entity::Address, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures;
    use crate::infrastructure::MemoryStore;

    #[test]
    fn created_address_can_be_found() {
        let store = MemoryStore::new();
        let created = fixtures::address(&store);
        let found = AddressService::new(store)
            .get_address(created.id)
            .expect("get failed");
        assert_eq!(found, created);
    }

    #[test]
    fn unknown_address_is_not_found() {
        let err = AddressService::new(MemoryStore::new())
            .get_address(Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: Entity::Address,
                ..
            }
        ));
    }
}
