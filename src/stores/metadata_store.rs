//! Metadata Store Adapter: FileRecord rows in SQLite.

use super::StoreResult;
use crate::models::file_record::{FileRecord, NewFileRecord};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

const RECORD_COLUMNS: &str = "id, filename, filepath, content_type, created_at, expires_at";

/// Contract over the external relational store. Records are append-only;
/// no update or delete operations exist.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert a record and return its assigned id. The id comes straight
    /// back from the insert, never from a follow-up recency query.
    async fn insert(&self, record: NewFileRecord) -> StoreResult<Uuid>;

    /// Look up a record by id.
    async fn select_by_id(&self, id: Uuid) -> StoreResult<Option<FileRecord>>;

    /// The most recently created record, if any.
    async fn select_latest(&self) -> StoreResult<Option<FileRecord>>;

    /// Every record, newest first.
    async fn select_all(&self) -> StoreResult<Vec<FileRecord>>;
}

/// SQLite-backed metadata store sharing the process-wide pool.
#[derive(Clone)]
pub struct SqliteMetadataStore {
    db: Arc<SqlitePool>,
}

impl SqliteMetadataStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    async fn insert(&self, record: NewFileRecord) -> StoreResult<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO files (id, filename, filepath, content_type, created_at, expires_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(record.id)
        .bind(&record.filename)
        .bind(&record.storage_key)
        .bind(&record.content_type)
        .bind(record.created_at)
        .bind(record.expires_at)
        .fetch_one(&*self.db)
        .await?;
        Ok(id)
    }

    async fn select_by_id(&self, id: Uuid) -> StoreResult<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM files WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(record)
    }

    async fn select_latest(&self) -> StoreResult<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM files ORDER BY created_at DESC LIMIT 1"
        ))
        .fetch_optional(&*self.db)
        .await?;
        Ok(record)
    }

    async fn select_all(&self) -> StoreResult<Vec<FileRecord>> {
        let records = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM files ORDER BY created_at DESC"
        ))
        .fetch_all(&*self.db)
        .await?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    async fn migrated_pool() -> Arc<SqlitePool> {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        for stmt in include_str!("../../migrations/0001_init.sql")
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            sqlx::query(stmt).execute(&pool).await.unwrap();
        }
        Arc::new(pool)
    }

    fn record(filename: &str, created_offset_secs: i64) -> NewFileRecord {
        let id = Uuid::new_v4();
        let created_at = Utc::now() + Duration::seconds(created_offset_secs);
        NewFileRecord {
            id,
            filename: filename.to_string(),
            storage_key: format!("upload/{id}-{filename}"),
            content_type: Some("text/plain".into()),
            created_at,
            expires_at: created_at + Duration::days(7),
        }
    }

    #[tokio::test]
    async fn insert_returns_the_id_and_select_by_id_round_trips() {
        let store = SqliteMetadataStore::new(migrated_pool().await);
        let input = record("report.txt", 0);
        let id = store.insert(input.clone()).await.unwrap();
        assert_eq!(id, input.id);

        let fetched = store.select_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.filename, "report.txt");
        assert_eq!(fetched.storage_key, input.storage_key);
        assert_eq!(fetched.content_type.as_deref(), Some("text/plain"));
        assert_eq!(fetched.expires_at, input.expires_at);
    }

    #[tokio::test]
    async fn select_by_id_of_unknown_id_is_none() {
        let store = SqliteMetadataStore::new(migrated_pool().await);
        assert!(store.select_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn select_latest_orders_by_created_at() {
        let store = SqliteMetadataStore::new(migrated_pool().await);
        assert!(store.select_latest().await.unwrap().is_none());

        store.insert(record("older.txt", -60)).await.unwrap();
        let newer = record("newer.txt", 0);
        store.insert(newer.clone()).await.unwrap();

        let latest = store.select_latest().await.unwrap().unwrap();
        assert_eq!(latest.id, newer.id);
    }

    #[tokio::test]
    async fn select_all_returns_newest_first() {
        let store = SqliteMetadataStore::new(migrated_pool().await);
        store.insert(record("a.txt", -120)).await.unwrap();
        store.insert(record("b.txt", -60)).await.unwrap();
        store.insert(record("c.txt", 0)).await.unwrap();

        let all = store.select_all().await.unwrap();
        let names: Vec<_> = all.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, ["c.txt", "b.txt", "a.txt"]);
    }

    #[tokio::test]
    async fn duplicate_storage_key_is_rejected() {
        let store = SqliteMetadataStore::new(migrated_pool().await);
        let first = record("dup.txt", 0);
        store.insert(first.clone()).await.unwrap();

        let mut second = record("dup.txt", 1);
        second.storage_key = first.storage_key.clone();
        assert!(store.insert(second).await.is_err());
    }
}
