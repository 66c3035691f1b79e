//! SQLite-backed slot store.

use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, LazyLock, mpsc};

use anyhow::Context;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};
use tokio::runtime::Runtime;
use tokio::sync::Mutex;

use crate::slot::SlotStore;

/// Runtime backing the synchronous trait methods. Queries are spawned here
/// and awaited over a channel, so callers may themselves sit inside an async
/// context without tripping the nested-runtime guard.
static WORKER: LazyLock<std::io::Result<Runtime>> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("velora-slots")
        .enable_all()
        .build()
});

fn worker() -> anyhow::Result<&'static Runtime> {
    match &*WORKER {
        Ok(rt) => Ok(rt),
        Err(err) => Err(anyhow::anyhow!("failed to start slot store worker: {err}")),
    }
}

/// Run a query future on the worker runtime and wait for its result.
fn run<T, F>(fut: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    worker()?.spawn(async move {
        let _ = tx.send(fut.await);
    });
    rx.recv().context("slot store worker dropped without replying")?
}

/// Durable slot store persisted in a single SQLite file.
///
/// The pool is wrapped in `Arc<Mutex<Option<_>>>` so the handle stays cheap
/// to clone and the database is only opened on first use. The trait methods
/// are synchronous (store mutations are synchronous by design); each call
/// hands its query to the shared worker runtime.
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: Arc<Mutex<Option<SqlitePool>>>,
    db_path: Option<PathBuf>,
}

impl LocalStore {
    /// Create a store at the default per-user data path (lazy initialization).
    pub fn new() -> Self {
        Self {
            pool: Arc::new(Mutex::new(None)),
            db_path: None,
        }
    }

    /// Create a store at an explicit database path. Used by tests and by
    /// configurations that override the data directory.
    pub fn at_path(path: PathBuf) -> Self {
        Self {
            pool: Arc::new(Mutex::new(None)),
            db_path: Some(path),
        }
    }

    /// Initialize the database connection (called lazily on first use).
    async fn ensure_initialized(&self) -> anyhow::Result<()> {
        let mut pool_guard = self.pool.lock().await;
        if pool_guard.is_some() {
            return Ok(());
        }

        let db_path = match &self.db_path {
            Some(path) => path.clone(),
            None => default_db_path()
                .context("failed to determine slot store path - ensure app data directory is accessible")?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create slot store directory at {:?}", parent))?;
        }

        let options = SqliteConnectOptions::from_str(&format!(
            "sqlite://{}",
            db_path.to_string_lossy()
        ))
        .with_context(|| format!("invalid slot store path {:?}", db_path))?
        .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("failed to open slot store at {:?}", db_path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
                key        TEXT PRIMARY KEY,
                data       TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create slots table")?;

        *pool_guard = Some(pool);
        Ok(())
    }

    /// Get the pool, initializing if necessary.
    async fn get_pool(&self) -> anyhow::Result<SqlitePool> {
        self.ensure_initialized().await?;
        let pool_guard = self.pool.lock().await;
        Ok(pool_guard
            .as_ref()
            .expect("pool initialized by ensure_initialized")
            .clone())
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotStore for LocalStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let store = self.clone();
        let key = key.to_string();

        run(async move {
            let pool = store.get_pool().await?;
            let row = sqlx::query(
                r#"
                SELECT data
                FROM slots
                WHERE key = ?1
                "#,
            )
            .bind(&key)
            .fetch_optional(&pool)
            .await
            .context("failed to read slot")?;

            match row {
                Some(row) => Ok(Some(row.try_get::<String, _>("data")?)),
                None => Ok(None),
            }
        })
    }

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let store = self.clone();
        let key = key.to_string();
        let value = value.to_string();

        run(async move {
            let pool = store.get_pool().await?;
            sqlx::query(
                r#"
                INSERT INTO slots (key, data, updated_at)
                VALUES (?1, ?2, datetime('now'))
                ON CONFLICT(key)
                DO UPDATE SET
                    data = excluded.data,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&key)
            .bind(&value)
            .execute(&pool)
            .await
            .context("failed to upsert slot")?;

            Ok(())
        })
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let store = self.clone();
        let key = key.to_string();

        run(async move {
            let pool = store.get_pool().await?;
            sqlx::query(
                r#"
                DELETE FROM slots
                WHERE key = ?1
                "#,
            )
            .bind(&key)
            .execute(&pool)
            .await
            .context("failed to delete slot")?;

            Ok(())
        })
    }
}

/// Resolve the default path to the SQLite slot database:
/// `{app_data_dir}/velora/local.db`.
fn default_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut dir = base;
    dir.push("velora");
    dir.push("local.db");

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalStore {
        let mut path = std::env::temp_dir();
        path.push(format!("velora-slots-{}.db", uuid::Uuid::now_v7()));
        LocalStore::at_path(path)
    }

    #[test]
    fn persists_across_handles_to_the_same_file() {
        let store = temp_store();
        store.put("auth-storage", r#"{"is_authenticated":false}"#).unwrap();

        let reopened = LocalStore::at_path(store.db_path.clone().unwrap());
        assert_eq!(
            reopened.get("auth-storage").unwrap().as_deref(),
            Some(r#"{"is_authenticated":false}"#)
        );
    }

    #[test]
    fn upsert_replaces_and_remove_clears() {
        let store = temp_store();
        store.put("cart-storage", "[]").unwrap();
        store.put("cart-storage", r#"[{"quantity":2}]"#).unwrap();
        assert_eq!(
            store.get("cart-storage").unwrap().as_deref(),
            Some(r#"[{"quantity":2}]"#)
        );

        store.remove("cart-storage").unwrap();
        assert_eq!(store.get("cart-storage").unwrap(), None);
    }

    // The stores call these methods while awaiting inside the app's async
    // operations, so they must not try to enter a second runtime.
    #[tokio::test]
    async fn callable_from_inside_an_async_runtime() {
        let store = temp_store();
        store.put("auth-storage", r#"{"is_authenticated":true}"#).unwrap();
        assert_eq!(
            store.get("auth-storage").unwrap().as_deref(),
            Some(r#"{"is_authenticated":true}"#)
        );
        store.remove("auth-storage").unwrap();
        assert_eq!(store.get("auth-storage").unwrap(), None);
    }
}
