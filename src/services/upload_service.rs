//! Upload Orchestrator — the two-step write at the heart of the service.
//!
//! An upload is one blob write followed by one metadata insert, in that
//! order and with no cross-store transaction. A blob-write failure aborts
//! before any row exists; a metadata-insert failure leaves an orphan blob
//! behind, which is logged and accepted (the orphan is unreachable and
//! never served). The record id is generated up front and embedded in the
//! storage key, so key uniqueness does not depend on wall-clock timing,
//! and the insert itself returns the id used to build the download link.

use crate::models::file_record::NewFileRecord;
use crate::services::{expiry, ids};
use crate::stores::{BlobStore, MetadataStore, StoreError};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("retention must be a positive number of days, got {0}")]
    InvalidRetention(i64),
    #[error("writing payload to blob store failed: {0}")]
    BlobWrite(#[source] StoreError),
    #[error("inserting metadata record failed: {0}")]
    MetadataWrite(#[source] StoreError),
}

/// Outcome of a successful upload.
#[derive(Clone, Debug)]
pub struct UploadReceipt {
    pub id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Coordinates id generation, the blob write, and the metadata insert.
/// Stateless across requests; the stores are the only shared state.
#[derive(Clone)]
pub struct UploadService {
    blobs: Arc<dyn BlobStore>,
    metadata: Arc<dyn MetadataStore>,
}

impl UploadService {
    pub fn new(blobs: Arc<dyn BlobStore>, metadata: Arc<dyn MetadataStore>) -> Self {
        Self { blobs, metadata }
    }

    /// Store `payload` for `retention_days` days and create its record.
    ///
    /// Empty payloads are accepted. Every call creates a new record, even
    /// for identical inputs.
    pub async fn upload(
        &self,
        filename: &str,
        content_type: Option<String>,
        payload: Bytes,
        retention_days: i64,
    ) -> Result<UploadReceipt, UploadError> {
        if retention_days <= 0 {
            return Err(UploadError::InvalidRetention(retention_days));
        }

        let id = ids::new_file_id();
        let storage_key = format!("upload/{}-{}", id, sanitize_filename(filename));
        let created_at = Utc::now();
        let expires_at = expiry::compute_expiry(created_at, retention_days);

        // Blob first: a failure here leaves nothing behind to compensate.
        self.blobs
            .put(&storage_key, payload)
            .await
            .map_err(UploadError::BlobWrite)?;

        let record = NewFileRecord {
            id,
            filename: filename.to_string(),
            storage_key: storage_key.clone(),
            content_type,
            created_at,
            expires_at,
        };
        let id = match self.metadata.insert(record).await {
            Ok(id) => id,
            Err(err) => {
                // The blob is now an orphan: present in storage, referenced
                // by nothing. Object stores make delete-on-failure
                // expensive, so it stays; it is unreachable and never
                // served.
                tracing::warn!(
                    storage_key = %storage_key,
                    error = %err,
                    "metadata insert failed after blob write; orphan blob left in place"
                );
                return Err(UploadError::MetadataWrite(err));
            }
        };

        tracing::debug!(%id, storage_key = %storage_key, %expires_at, "stored file");
        Ok(UploadReceipt { id, expires_at })
    }
}

/// Longest filename fragment allowed inside a storage key. Keys carry a
/// fixed `upload/<uuid>-` prefix, so this keeps every generated key well
/// under the blob store's length cap.
const MAX_KEY_FILENAME_LEN: usize = 120;

/// Reduce a client-supplied filename to something safe inside a storage
/// key: final path component only, no control bytes, no `..` sequences,
/// bounded length, never empty. The record keeps the original filename
/// untouched; only the key uses the sanitized form.
fn sanitize_filename(filename: &str) -> String {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();
    let mut cleaned: String = last
        .chars()
        .filter(|c| !c.is_control() && *c != '\0')
        .collect();
    // `..` anywhere in a key is rejected by the blob store, and a
    // filename is allowed to contain it. Collapse runs of dots down to
    // one so the key stays legal whatever the name looks like.
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", ".");
    }
    if cleaned.len() > MAX_KEY_FILENAME_LEN {
        let mut end = MAX_KEY_FILENAME_LEN;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        cleaned.truncate(end);
    }
    if cleaned.is_empty() || cleaned == "." {
        "file".to_string()
    } else {
        cleaned
    }
}
