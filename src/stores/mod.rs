//! Adapter contracts over the two external stores.
//!
//! The upload and resolution services only ever see these traits, so the
//! real backends (local disk, SQLite) can be swapped for in-memory fakes
//! in tests. Both adapters surface failures through [`StoreError`] and
//! leave retry behavior to the underlying clients.

pub mod blob_store;
pub mod metadata_store;

pub use blob_store::{BlobStore, FsBlobStore};
pub use metadata_store::{MetadataStore, SqliteMetadataStore};

use std::io;
use thiserror::Error;

/// Transport-level or structural failure from either store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key rejected before touching the store (empty, absolute, `..`,
    /// control bytes).
    #[error("invalid storage key")]
    InvalidKey,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory fakes with failure injection, shared by service tests.

    use super::{BlobStore, MetadataStore, StoreError, StoreResult};
    use crate::models::file_record::{FileRecord, NewFileRecord};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MemoryBlobStore {
        blobs: Mutex<HashMap<String, Bytes>>,
        fail_puts: AtomicBool,
    }

    impl MemoryBlobStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every subsequent `put` fail with an I/O error.
        pub fn fail_puts(&self) {
            self.fail_puts.store(true, Ordering::SeqCst);
        }

        pub fn contains(&self, key: &str) -> bool {
            self.blobs.lock().unwrap().contains_key(key)
        }

        pub fn remove(&self, key: &str) {
            self.blobs.lock().unwrap().remove(key);
        }

        pub fn len(&self) -> usize {
            self.blobs.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl BlobStore for MemoryBlobStore {
        async fn put(&self, key: &str, bytes: Bytes) -> StoreResult<()> {
            if self.fail_puts.load(Ordering::SeqCst) {
                return Err(StoreError::Io(io::Error::other("injected put failure")));
            }
            self.blobs.lock().unwrap().insert(key.to_string(), bytes);
            Ok(())
        }

        async fn get(&self, key: &str) -> StoreResult<Option<Bytes>> {
            Ok(self.blobs.lock().unwrap().get(key).cloned())
        }
    }

    #[derive(Default)]
    pub struct MemoryMetadataStore {
        records: Mutex<Vec<FileRecord>>,
        fail_inserts: AtomicBool,
    }

    impl MemoryMetadataStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every subsequent `insert` fail with a database error.
        pub fn fail_inserts(&self) {
            self.fail_inserts.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl MetadataStore for MemoryMetadataStore {
        async fn insert(&self, record: NewFileRecord) -> StoreResult<Uuid> {
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(StoreError::Sqlx(sqlx::Error::PoolClosed));
            }
            let record = record.into_record();
            let id = record.id;
            self.records.lock().unwrap().push(record);
            Ok(id)
        }

        async fn select_by_id(&self, id: Uuid) -> StoreResult<Option<FileRecord>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned())
        }

        async fn select_latest(&self) -> StoreResult<Option<FileRecord>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .max_by_key(|r| r.created_at)
                .cloned())
        }

        async fn select_all(&self) -> StoreResult<Vec<FileRecord>> {
            let mut all = self.records.lock().unwrap().clone();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        }
    }
}
