use crate::model::{Cupcake, CupcakeId, NewCupcake};
use anyhow::Result;

/// Persistence gateway for cupcakes.
///
/// Implementations set `created_at`/`updated_at` themselves and treat
/// `replace` as a full-row overwrite keyed by `cupcake.id`.
#[async_trait::async_trait]
pub trait CupcakeStore: Send + Sync {
    /// Insert a new cupcake and return it with its assigned id and timestamps
    async fn create(&self, cupcake: NewCupcake) -> Result<Cupcake>;
    async fn find_by_id(&self, id: CupcakeId) -> Result<Option<Cupcake>>;
    /// All cupcakes in insertion order
    async fn find_all(&self) -> Result<Vec<Cupcake>>;
    /// Overwrite every mutable column; `None` if the row no longer exists
    async fn replace(&self, cupcake: &Cupcake) -> Result<Option<Cupcake>>;
    async fn delete(&self, id: CupcakeId) -> Result<bool>;
    async fn exists(&self, id: CupcakeId) -> Result<bool>;
}
