//! Embedded SQLite image: schema DDL, load from disk, and whole-file persistence.
//!
//! The live database is in memory behind a single pooled connection. After every mutation
//! the whole image is written out with `VACUUM INTO` and renamed over the target file.

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Table known to the store: name, column allow-list (pk first) and DDL.
#[derive(Debug)]
pub struct TableSchema {
    pub name: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [&'static str],
    pub ddl: &'static str,
}

impl TableSchema {
    /// Columns a caller may write; the primary key is assigned by storage.
    pub fn writable_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().copied().filter(move |c| *c != self.primary_key)
    }
}

pub const NOTES_TABLE: TableSchema = TableSchema {
    name: "notes",
    primary_key: "id",
    columns: &["id", "title", "content", "created_at"],
    ddl: r#"
        CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT DEFAULT (datetime('now', 'localtime'))
        )
    "#,
};

/// Every table created at startup and copied when loading an image.
pub const TABLES: &[&TableSchema] = &[&NOTES_TABLE];

const SNAPSHOT_SCHEMA: &str = "snapshot";

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    path: Option<Arc<PathBuf>>,
    persist_lock: Arc<Mutex<()>>,
}

impl Store {
    /// Open the image at `path` (created if missing), then write it back once so the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let store = Self::connect(Some(path.clone())).await?;
        if tokio::fs::try_exists(&path).await? {
            store.load_image(&path).await?;
            tracing::info!(path = %path.display(), "loaded database image");
        } else {
            tracing::info!(path = %path.display(), "creating database image");
        }
        store.persist().await?;
        Ok(store)
    }

    /// Store with no backing file; `persist` is a no-op.
    pub async fn in_memory() -> Result<Self, AppError> {
        Self::connect(None).await
    }

    async fn connect(path: Option<PathBuf>) -> Result<Self, AppError> {
        // Plain private `:memory:`. The memory open flag would also apply to ATTACH and VACUUM INTO targets.
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .create_if_missing(true)
            .shared_cache(false);
        // One connection that never expires: closing it would drop the in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Store {
            pool,
            path: path.map(Arc::new),
            persist_lock: Arc::new(Mutex::new(())),
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref().map(PathBuf::as_path)
    }

    async fn ensure_schema(&self) -> Result<(), AppError> {
        for table in TABLES {
            sqlx::query(table.ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// `SELECT 1` against the live database.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn load_image(&self, path: &Path) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(&format!("ATTACH DATABASE ? AS {}", SNAPSHOT_SCHEMA))
            .bind(path.to_string_lossy().into_owned())
            .execute(&mut *conn)
            .await?;
        let copied = copy_snapshot(&mut conn).await;
        let detached = sqlx::query(&format!("DETACH DATABASE {}", SNAPSHOT_SCHEMA))
            .execute(&mut *conn)
            .await;
        copied?;
        detached?;
        Ok(())
    }

    /// Rewrite the whole image at the backing path. Concurrent calls run one after another; last writer wins.
    pub async fn persist(&self) -> Result<(), AppError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let _guard = self.persist_lock.lock().await;
        let tmp = temp_path(path);
        // VACUUM INTO refuses to overwrite.
        if tokio::fs::try_exists(&tmp).await? {
            tokio::fs::remove_file(&tmp).await?;
        }
        sqlx::query("VACUUM INTO ?")
            .bind(tmp.to_string_lossy().into_owned())
            .execute(&self.pool)
            .await?;
        tokio::fs::rename(&tmp, path).await?;
        tracing::debug!(path = %path.display(), "persisted database image");
        Ok(())
    }
}

async fn snapshot_has_table(conn: &mut SqliteConnection, name: &str) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {}.sqlite_master WHERE type = 'table' AND name = ?",
        SNAPSHOT_SCHEMA
    ))
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}

async fn copy_snapshot(conn: &mut SqliteConnection) -> Result<(), AppError> {
    for table in TABLES {
        if !snapshot_has_table(conn, table.name).await? {
            continue;
        }
        let cols = table
            .columns
            .iter()
            .map(|c| crate::sql::quoted(c))
            .collect::<Vec<_>>()
            .join(", ");
        let name = crate::sql::quoted(table.name);
        sqlx::query(&format!("DELETE FROM main.{}", name)).execute(&mut *conn).await?;
        let sql = format!(
            "INSERT INTO main.{} ({}) SELECT {} FROM {}.{}",
            name, cols, cols, SNAPSHOT_SCHEMA, name
        );
        tracing::debug!(sql = %sql, "copy table");
        sqlx::query(&sql).execute(&mut *conn).await?;
    }
    // Keep AUTOINCREMENT from reusing ids of rows deleted before the restart.
    if snapshot_has_table(conn, "sqlite_sequence").await? {
        sqlx::query("DELETE FROM main.sqlite_sequence").execute(&mut *conn).await?;
        sqlx::query(&format!(
            "INSERT INTO main.sqlite_sequence (name, seq) SELECT name, seq FROM {}.sqlite_sequence",
            SNAPSHOT_SCHEMA
        ))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "db.sqlite".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_store_has_notes_table() {
        let store = Store::in_memory().await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(store.path().is_none());
        store.persist().await.unwrap();
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn open_creates_file_and_reload_keeps_rows_and_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("notes.sqlite");

        let store = Store::open(&path).await.unwrap();
        assert!(path.exists());
        for title in ["a", "b"] {
            sqlx::query("INSERT INTO notes (title, content) VALUES (?, 'x')")
                .bind(title)
                .execute(store.pool())
                .await
                .unwrap();
        }
        sqlx::query("DELETE FROM notes WHERE id = 2").execute(store.pool()).await.unwrap();
        store.persist().await.unwrap();
        drop(store);

        let reopened = Store::open(&path).await.unwrap();
        let titles: Vec<String> = sqlx::query_scalar("SELECT title FROM notes ORDER BY id")
            .fetch_all(reopened.pool())
            .await
            .unwrap();
        assert_eq!(titles, vec!["a".to_string()]);

        let next_id = sqlx::query("INSERT INTO notes (title, content) VALUES ('c', 'x')")
            .execute(reopened.pool())
            .await
            .unwrap()
            .last_insert_rowid();
        assert_eq!(next_id, 3);
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn persist_writes_a_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.sqlite");
        let store = Store::open(&path).await.unwrap();
        sqlx::query("INSERT INTO notes (title, content) VALUES ('t', 'c')")
            .execute(store.pool())
            .await
            .unwrap();
        store.persist().await.unwrap();

        let file = SqlitePool::connect_with(SqliteConnectOptions::new().filename(&path))
            .await
            .unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&file)
            .await
            .unwrap();
        assert_eq!(count, 1);
        file.close().await;
    }

    #[tokio::test]
    async fn open_loads_an_image_written_by_another_connection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.sqlite");
        {
            let file = SqlitePool::connect_with(
                SqliteConnectOptions::new().filename(&path).create_if_missing(true),
            )
            .await
            .unwrap();
            sqlx::query(NOTES_TABLE.ddl).execute(&file).await.unwrap();
            for (title, content) in [("first", "one"), ("second", "two")] {
                sqlx::query("INSERT INTO notes (title, content) VALUES (?, ?)")
                    .bind(title)
                    .bind(content)
                    .execute(&file)
                    .await
                    .unwrap();
            }
            file.close().await;
        }

        let store = Store::open(&path).await.unwrap();
        let titles: Vec<String> = sqlx::query_scalar("SELECT title FROM notes ORDER BY id")
            .fetch_all(store.pool())
            .await
            .unwrap();
        assert_eq!(titles, vec!["first".to_string(), "second".to_string()]);
        let created: Option<String> = sqlx::query_scalar("SELECT created_at FROM notes WHERE id = 1")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert!(created.is_some());
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let tmp = temp_path(Path::new("/var/lib/notes/db.sqlite"));
        assert_eq!(tmp, PathBuf::from("/var/lib/notes/db.sqlite.tmp"));
    }

    #[test]
    fn writable_columns_skip_primary_key() {
        let cols: Vec<_> = NOTES_TABLE.writable_columns().collect();
        assert_eq!(cols, vec!["title", "content", "created_at"]);
    }
}
