use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::model::{Cupcake, CupcakeId, NewCupcake};
use crate::store::row::{into_cupcakes, CupcakeRow, CUPCAKE_COLUMNS};
use crate::store::traits::CupcakeStore;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open a SQLite store.
    ///
    /// `dsn` may be a file path (created when missing), `:memory:`, or a
    /// `sqlite:` URL. In-memory databases live inside one connection, so
    /// the pool is pinned to a single connection that never expires.
    pub async fn new(dsn: &str, max_connections: u32) -> Result<Self> {
        let in_memory = is_in_memory(dsn);

        let options = if dsn == ":memory:" {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else if dsn.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(dsn)
                .with_context(|| format!("Invalid SQLite DSN '{}'", dsn))?
                .create_if_missing(true)
        } else {
            SqliteConnectOptions::new()
                .filename(dsn)
                .create_if_missing(true)
        };

        let mut pool_options = SqlitePoolOptions::new();
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("error connecting to database")?;

        Ok(Self { pool })
    }

    /// Fresh private in-memory database, mostly useful in tests
    pub async fn in_memory() -> Result<Self> {
        Self::new(":memory:", 1).await
    }

    /// Create the cupcakes table if it does not exist yet
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cupcakes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(100) NOT NULL,
                flavor VARCHAR(100) NOT NULL,
                price_cents INTEGER NOT NULL,
                is_available BOOLEAN NOT NULL DEFAULT 1,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
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

fn is_in_memory(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

#[async_trait::async_trait]
impl CupcakeStore for SqliteStore {
    async fn create(&self, cupcake: NewCupcake) -> Result<Cupcake> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO cupcakes (name, flavor, price_cents, is_available, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {}",
            CUPCAKE_COLUMNS
        );

        let row: CupcakeRow = sqlx::query_as(&sql)
            .bind(&cupcake.name)
            .bind(&cupcake.flavor)
            .bind(cupcake.price_cents)
            .bind(cupcake.is_available)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .context("Failed to create cupcake")?;

        row.try_into()
    }

    async fn find_by_id(&self, id: CupcakeId) -> Result<Option<Cupcake>> {
        let sql = format!("SELECT {} FROM cupcakes WHERE id = ?", CUPCAKE_COLUMNS);

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
            "UPDATE cupcakes SET name = ?, flavor = ?, price_cents = ?, is_available = ?, updated_at = ? \
             WHERE id = ? RETURNING {}",
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
        let result = sqlx::query("DELETE FROM cupcakes WHERE id = ?")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .context("Failed to delete cupcake")?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: CupcakeId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cupcakes WHERE id = ?")
            .bind(i64::from(id))
            .fetch_one(&self.pool)
            .await
            .context("Failed to check cupcake existence")?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_store() -> SqliteStore {
        let store = SqliteStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        store
    }

    fn new_cupcake(name: &str, flavor: &str, price_cents: i32) -> NewCupcake {
        NewCupcake {
            name: name.to_string(),
            flavor: flavor.to_string(),
            price_cents,
            is_available: true,
        }
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = setup_store().await;
        store.migrate().await.unwrap();
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let store = setup_store().await;

        let cupcake = store
            .create(NewCupcake {
                is_available: false,
                ..new_cupcake("Chocolate Special", "Belgian Chocolate", 1500)
            })
            .await
            .unwrap();

        assert!(cupcake.id > 0);
        assert_eq!(cupcake.name, "Chocolate Special");
        assert_eq!(cupcake.flavor, "Belgian Chocolate");
        assert_eq!(cupcake.price_cents, 1500);
        assert!(!cupcake.is_available);
        assert_eq!(cupcake.created_at, cupcake.updated_at);

        let fetched = store.find_by_id(cupcake.id).await.unwrap().unwrap();
        assert_eq!(fetched, cupcake);
    }

    #[tokio::test]
    async fn test_find_by_id_missing_returns_none() {
        let store = setup_store().await;
        assert!(store.find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_preserves_insertion_order() {
        let store = setup_store().await;
        assert!(store.find_all().await.unwrap().is_empty());

        store.create(new_cupcake("C1", "F1", 100)).await.unwrap();
        store.create(new_cupcake("C2", "F2", 200)).await.unwrap();

        let cupcakes = store.find_all().await.unwrap();
        assert_eq!(cupcakes.len(), 2);
        assert_eq!(cupcakes[0].name, "C1");
        assert_eq!(cupcakes[1].name, "C2");
        assert!(cupcakes[0].id < cupcakes[1].id);
    }

    #[tokio::test]
    async fn test_replace_overwrites_row_and_keeps_created_at() {
        let store = setup_store().await;
        let original = store
            .create(new_cupcake("Old Name", "Old Flavor", 100))
            .await
            .unwrap();

        let mut changed = original.clone();
        changed.name = "New Name".to_string();
        changed.flavor = "New Flavor".to_string();
        changed.price_cents = 200;
        changed.is_available = false;

        let replaced = store.replace(&changed).await.unwrap().unwrap();
        assert_eq!(replaced.name, "New Name");
        assert_eq!(replaced.flavor, "New Flavor");
        assert_eq!(replaced.price_cents, 200);
        assert!(!replaced.is_available);
        assert_eq!(replaced.created_at, original.created_at);
        assert!(replaced.updated_at >= original.updated_at);

        let fetched = store.find_by_id(original.id).await.unwrap().unwrap();
        assert_eq!(fetched, replaced);
    }

    #[tokio::test]
    async fn test_replace_missing_row_returns_none() {
        let store = setup_store().await;
        let ghost = store.create(new_cupcake("Ghost", "Air", 100)).await.unwrap();
        assert!(store.delete(ghost.id).await.unwrap());

        assert!(store.replace(&ghost).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_and_exists() {
        let store = setup_store().await;
        let cupcake = store.create(new_cupcake("To Delete", "Test", 100)).await.unwrap();

        assert!(store.exists(cupcake.id).await.unwrap());
        assert!(!store.exists(999).await.unwrap());

        assert!(store.delete(cupcake.id).await.unwrap());
        assert!(!store.exists(cupcake.id).await.unwrap());
        assert!(store.find_by_id(cupcake.id).await.unwrap().is_none());

        assert!(!store.delete(cupcake.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = setup_store().await;
        let first = store.create(new_cupcake("First", "A", 100)).await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.create(new_cupcake("Second", "B", 100)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory(":memory:"));
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file.db?mode=memory"));
        assert!(!is_in_memory("cupcake_store.db"));
        assert!(!is_in_memory("sqlite://cupcake_store.db"));
    }
}
