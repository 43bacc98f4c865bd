//! Generic table CRUD against the embedded store. One `Table<E>` per entity type.

use crate::error::AppError;
use crate::sql::{self, bind_params, OrderBy, QueryBuf, Record};
use crate::store::{Store, TableSchema};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;
use std::marker::PhantomData;

/// A row type stored in one table of the store.
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static {
    const TABLE: &'static TableSchema;
}

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Full scan; storage order unless `order` is given.
    async fn find_all(&self, order: Option<OrderBy>) -> Result<Vec<E>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<E>, AppError>;
    async fn exists(&self, id: i64) -> Result<bool, AppError>;
    /// Returns the storage-assigned id.
    async fn insert(&self, fields: &Record) -> Result<i64, AppError>;
    async fn update(&self, id: i64, fields: &Record) -> Result<(), AppError>;
    /// Missing ids are not an error.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

/// Repository over `E::TABLE`. Every mutation rewrites the store image.
pub struct Table<E> {
    store: Store,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Table<E> {
    fn clone(&self) -> Self {
        Table {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Table<E> {
    pub fn new(store: Store) -> Self {
        Table {
            store,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    async fn fetch_many(&self, q: &QueryBuf) -> Result<Vec<E>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_params(sqlx::query(&q.sql), &q.params)
            .fetch_all(self.store.pool())
            .await?;
        Ok(rows.iter().map(|r| E::from_row(r)).collect::<Result<Vec<_>, _>>()?)
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<SqliteRow>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(sqlx::query(&q.sql), &q.params)
            .fetch_optional(self.store.pool())
            .await?;
        Ok(row)
    }

    async fn execute(&self, q: &QueryBuf) -> Result<sqlx::sqlite::SqliteQueryResult, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let result = bind_params(sqlx::query(&q.sql), &q.params)
            .execute(self.store.pool())
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for Table<E> {
    async fn find_all(&self, order: Option<OrderBy>) -> Result<Vec<E>, AppError> {
        let q = sql::select_all(E::TABLE, order.as_ref())?;
        self.fetch_many(&q).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E>, AppError> {
        let q = sql::select_by_id(E::TABLE, id)?;
        let row = self.fetch_optional(&q).await?;
        Ok(row.as_ref().map(|r| E::from_row(r)).transpose()?)
    }

    async fn exists(&self, id: i64) -> Result<bool, AppError> {
        let q = sql::exists_by_id(E::TABLE, id)?;
        Ok(self.fetch_optional(&q).await?.is_some())
    }

    async fn insert(&self, fields: &Record) -> Result<i64, AppError> {
        let q = sql::insert(E::TABLE, fields)?;
        let id = self.execute(&q).await?.last_insert_rowid();
        self.store.persist().await?;
        Ok(id)
    }

    async fn update(&self, id: i64, fields: &Record) -> Result<(), AppError> {
        let Some(q) = sql::update(E::TABLE, id, fields)? else {
            return Ok(());
        };
        self.execute(&q).await?;
        self.store.persist().await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let q = sql::delete(E::TABLE, id)?;
        let affected = self.execute(&q).await?.rows_affected();
        tracing::debug!(table = E::TABLE.name, id, affected, "delete");
        self.store.persist().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NOTES_TABLE;
    use serde_json::json;

    #[derive(Debug, sqlx::FromRow)]
    struct StoredNote {
        id: i64,
        title: String,
        content: String,
        created_at: String,
    }

    impl Entity for StoredNote {
        const TABLE: &'static TableSchema = &NOTES_TABLE;
    }

    async fn table() -> Table<StoredNote> {
        Table::new(Store::in_memory().await.unwrap())
    }

    fn fields(title: &str, content: &str) -> Record {
        let mut r = Record::new();
        r.insert("title".into(), json!(title));
        r.insert("content".into(), json!(content));
        r
    }

    #[tokio::test]
    async fn insert_then_find() {
        let t = table().await;
        let id = t.insert(&fields("t", "c")).await.unwrap();
        assert!(id > 0);
        let row = t.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.title, "t");
        assert_eq!(row.content, "c");
        assert!(!row.created_at.is_empty());
        assert!(t.exists(id).await.unwrap());
        assert!(t.find_by_id(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_all_respects_order() {
        let t = table().await;
        for title in ["a", "b", "c"] {
            t.insert(&fields(title, "x")).await.unwrap();
        }
        let asc: Vec<String> = t.find_all(None).await.unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(asc, ["a", "b", "c"]);
        let desc: Vec<String> = t
            .find_all(Some(OrderBy::desc("id")))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(desc, ["c", "b", "a"]);
    }

    #[tokio::test]
    async fn update_sets_only_given_fields() {
        let t = table().await;
        let id = t.insert(&fields("t", "c")).await.unwrap();
        let mut patch = Record::new();
        patch.insert("title".into(), json!("t2"));
        t.update(id, &patch).await.unwrap();
        let row = t.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(row.title, "t2");
        assert_eq!(row.content, "c");
        t.update(id, &Record::new()).await.unwrap();
    }

    #[tokio::test]
    async fn delete_is_quiet_for_missing_ids() {
        let t = table().await;
        let id = t.insert(&fields("t", "c")).await.unwrap();
        t.delete(id).await.unwrap();
        assert!(!t.exists(id).await.unwrap());
        t.delete(id).await.unwrap();
        t.delete(999).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_unknown_columns() {
        let t = table().await;
        let mut bad = Record::new();
        bad.insert("owner".into(), json!("me"));
        assert!(matches!(t.insert(&bad).await, Err(AppError::InvalidIdentifier(_))));
        assert!(matches!(
            t.find_all(Some(OrderBy::asc("owner"))).await,
            Err(AppError::InvalidIdentifier(_))
        ));
    }
}
