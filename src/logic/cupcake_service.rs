use std::sync::Arc;

use crate::logic::validate::{apply_update, validate_create};
use crate::logic::ServiceError;
use crate::model::{CreateCupcakeRequest, Cupcake, CupcakeId, UpdateCupcakeRequest};
use crate::store::traits::CupcakeStore;

/// Sequences validation and persistence for every cupcake operation.
///
/// The store is injected at construction; the service keeps no other state.
pub struct CupcakeService<S: CupcakeStore> {
    store: Arc<S>,
}

impl<S: CupcakeStore> CupcakeService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn create(&self, request: &CreateCupcakeRequest) -> Result<Cupcake, ServiceError> {
        let new_cupcake = validate_create(request)?;
        let cupcake = self.store.create(new_cupcake).await?;
        log::debug!("Created cupcake {}", cupcake.id);
        Ok(cupcake)
    }

    /// Missing rows surface as `ServiceError::NotFound`
    pub async fn get(&self, id: CupcakeId) -> Result<Cupcake, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<Cupcake>, ServiceError> {
        Ok(self.store.find_all().await?)
    }

    /// Fetch, merge and write back the whole row.
    ///
    /// A rejected merge leaves the stored row untouched. Concurrent updates
    /// to the same id are last-writer-wins.
    pub async fn update(
        &self,
        id: CupcakeId,
        request: &UpdateCupcakeRequest,
    ) -> Result<Cupcake, ServiceError> {
        let existing = self.get(id).await?;
        let merged = apply_update(&existing, request)?;

        let updated = self
            .store
            .replace(&merged)
            .await?
            .ok_or(ServiceError::NotFound)?;
        log::debug!("Updated cupcake {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: CupcakeId) -> Result<(), ServiceError> {
        if !self.store.exists(id).await? {
            return Err(ServiceError::CupcakeNotFound);
        }

        self.store.delete(id).await?;
        log::debug!("Deleted cupcake {}", id);
        Ok(())
    }
}
