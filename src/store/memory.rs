use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::RwLock;

use crate::model::{Cupcake, CupcakeId, NewCupcake};
use crate::store::traits::CupcakeStore;

/// In-process store with the same contract as the SQL stores.
///
/// Ids increase monotonically and are never reused, matching an
/// autoincrement column. The lock is never held across an await.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: CupcakeId,
    rows: BTreeMap<CupcakeId, Cupcake>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl CupcakeStore for MemoryStore {
    async fn create(&self, cupcake: NewCupcake) -> Result<Cupcake> {
        let mut state = self.inner.write();
        let id = state
            .last_id
            .checked_add(1)
            .context("Cupcake id space exhausted")?;
        let now = Utc::now();

        let created = Cupcake {
            id,
            name: cupcake.name,
            flavor: cupcake.flavor,
            price_cents: cupcake.price_cents,
            is_available: cupcake.is_available,
            created_at: now,
            updated_at: now,
        };

        state.last_id = id;
        state.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: CupcakeId) -> Result<Option<Cupcake>> {
        Ok(self.inner.read().rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Cupcake>> {
        Ok(self.inner.read().rows.values().cloned().collect())
    }

    async fn replace(&self, cupcake: &Cupcake) -> Result<Option<Cupcake>> {
        let mut state = self.inner.write();
        let Some(row) = state.rows.get_mut(&cupcake.id) else {
            return Ok(None);
        };

        *row = Cupcake {
            created_at: row.created_at,
            updated_at: Utc::now(),
            ..cupcake.clone()
        };
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: CupcakeId) -> Result<bool> {
        Ok(self.inner.write().rows.remove(&id).is_some())
    }

    async fn exists(&self, id: CupcakeId) -> Result<bool> {
        Ok(self.inner.read().rows.contains_key(&id))
    }
}
