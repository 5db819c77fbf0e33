use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::model::{Cupcake, CupcakeId, NewCupcake};
use crate::store::row::{into_cupcakes, CupcakeRow, CUPCAKE_COLUMNS};
use crate::store::traits::CupcakeStore;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("error connecting to database")?;

        Ok(Self { pool })
    }

    /// Create the cupcakes table if it does not exist yet
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cupcakes (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                flavor VARCHAR(100) NOT NULL,
                price_cents INTEGER NOT NULL,
                is_available BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("error running migrations")?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl CupcakeStore for PostgresStore {
    async fn create(&self, cupcake: NewCupcake) -> Result<Cupcake> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO cupcakes (name, flavor, price_cents, is_available, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING {}",
            CUPCAKE_COLUMNS
        );

        let row: CupcakeRow = sqlx::query_as(&sql)
            .bind(&cupcake.name)
            .bind(&cupcake.flavor)
            .bind(cupcake.price_cents)
            .bind(cupcake.is_available)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .context("Failed to create cupcake")?;

        row.try_into()
    }

    async fn find_by_id(&self, id: CupcakeId) -> Result<Option<Cupcake>> {
        let sql = format!("SELECT {} FROM cupcakes WHERE id = $1", CUPCAKE_COLUMNS);

        let row: Option<CupcakeRow> = sqlx::query_as(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch cupcake")?;

        row.map(Cupcake::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Cupcake>> {
        let sql = format!("SELECT {} FROM cupcakes ORDER BY id", CUPCAKE_COLUMNS);

        let rows: Vec<CupcakeRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list cupcakes")?;

        into_cupcakes(rows)
    }

    async fn replace(&self, cupcake: &Cupcake) -> Result<Option<Cupcake>> {
        let sql = format!(
            "UPDATE cupcakes SET name = $1, flavor = $2, price_cents = $3, is_available = $4, updated_at = $5 \
             WHERE id = $6 RETURNING {}",
            CUPCAKE_COLUMNS
        );

        let row: Option<CupcakeRow> = sqlx::query_as(&sql)
            .bind(&cupcake.name)
            .bind(&cupcake.flavor)
            .bind(cupcake.price_cents)
            .bind(cupcake.is_available)
            .bind(Utc::now())
            .bind(i64::from(cupcake.id))
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update cupcake")?;

        row.map(Cupcake::try_from).transpose()
    }

    async fn delete(&self, id: CupcakeId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cupcakes WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .context("Failed to delete cupcake")?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: CupcakeId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cupcakes WHERE id = $1")
            .bind(i64::from(id))
            .fetch_one(&self.pool)
            .await
            .context("Failed to check cupcake existence")?;

        Ok(count > 0)
    }
}
