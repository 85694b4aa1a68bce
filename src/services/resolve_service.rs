//! Resolution Service — turns an id back into metadata or bytes.
//!
//! Metadata reads never check expiry (expired records are still
//! inspectable); downloads check it strictly, then fetch the blob. A
//! record whose blob has vanished is a store-consistency fault, distinct
//! from a plain not-found.

use crate::models::file_record::FileRecord;
use crate::services::expiry;
use crate::stores::{BlobStore, MetadataStore, StoreError};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no file record for id {0}")]
    NotFound(Uuid),
    #[error("file expired at {expires_at}")]
    Expired { expires_at: DateTime<Utc> },
    #[error("blob `{storage_key}` missing for live record {id}")]
    BlobMissing { id: Uuid, storage_key: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A fully assembled download: the payload plus the response metadata the
/// HTTP layer needs for its headers.
#[derive(Clone, Debug)]
pub struct DownloadPayload {
    pub bytes: Bytes,
    pub filename: String,
    pub content_type: String,
    pub length: u64,
}

#[derive(Clone)]
pub struct ResolveService {
    blobs: Arc<dyn BlobStore>,
    metadata: Arc<dyn MetadataStore>,
}

impl ResolveService {
    pub fn new(blobs: Arc<dyn BlobStore>, metadata: Arc<dyn MetadataStore>) -> Self {
        Self { blobs, metadata }
    }

    /// Fetch a record without an expiry check.
    pub async fn metadata(&self, id: Uuid) -> Result<FileRecord, ResolveError> {
        self.metadata
            .select_by_id(id)
            .await?
            .ok_or(ResolveError::NotFound(id))
    }

    /// Every record, newest first.
    pub async fn list(&self) -> Result<Vec<FileRecord>, ResolveError> {
        Ok(self.metadata.select_all().await?)
    }

    /// Fetch the payload for `id`, refusing expired records. The record is
    /// left in place either way; expiry never deletes anything.
    pub async fn download(&self, id: Uuid) -> Result<DownloadPayload, ResolveError> {
        self.download_at(id, Utc::now()).await
    }

    async fn download_at(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DownloadPayload, ResolveError> {
        let record = self.metadata(id).await?;

        if expiry::is_expired(record.expires_at, now) {
            return Err(ResolveError::Expired {
                expires_at: record.expires_at,
            });
        }

        let bytes = self
            .blobs
            .get(&record.storage_key)
            .await?
            .ok_or_else(|| ResolveError::BlobMissing {
                id,
                storage_key: record.storage_key.clone(),
            })?;

        let length = bytes.len() as u64;
        let content_type = record
            .content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

        Ok(DownloadPayload {
            bytes,
            filename: record.filename,
            content_type,
            length,
        })
    }
}
