use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::model::{Cupcake, CupcakeId};

/// Column list shared by every SELECT / RETURNING clause.
pub(crate) const CUPCAKE_COLUMNS: &str =
    "id, name, flavor, price_cents, is_available, created_at, updated_at";

/// Raw `cupcakes` row as both SQL backends decode it
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CupcakeRow {
    pub id: i64,
    pub name: String,
    pub flavor: String,
    pub price_cents: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CupcakeRow> for Cupcake {
    type Error = anyhow::Error;

    fn try_from(row: CupcakeRow) -> Result<Self> {
        let id = CupcakeId::try_from(row.id)
            .with_context(|| format!("Cupcake id {} is out of range", row.id))?;

        Ok(Cupcake {
            id,
            name: row.name,
            flavor: row.flavor,
            price_cents: row.price_cents,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn into_cupcakes(rows: Vec<CupcakeRow>) -> Result<Vec<Cupcake>> {
    rows.into_iter().map(Cupcake::try_from).collect()
}
