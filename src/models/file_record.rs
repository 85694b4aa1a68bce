//! Represents a stored file and its retention window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One uploaded file, as persisted in the metadata store.
///
/// The record carries everything needed to serve a download later: the
/// display name, the key the payload lives under in the blob store, the
/// reported MIME type, and the validity window. Records are append-only;
/// nothing in the service updates or deletes them.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Unique identifier, assigned at upload time. Primary lookup key and
    /// the only value exposed in download URLs.
    pub id: Uuid,

    /// Original client-supplied display name. Opaque; never used as a
    /// storage key.
    pub filename: String,

    /// Key under which the payload is stored in the blob store. Unique
    /// across all records.
    #[sqlx(rename = "filepath")]
    #[serde(rename = "filepath")]
    pub storage_key: String,

    /// MIME type as reported by the uploader, if any.
    pub content_type: Option<String>,

    /// When the record was inserted. Used only for recency ordering.
    pub created_at: DateTime<Utc>,

    /// Instant after which downloads are refused. The instant itself is
    /// still valid.
    pub expires_at: DateTime<Utc>,
}

/// Insert input for a new [`FileRecord`]. The id is generated by the
/// caller before the blob write so the storage key can embed it.
#[derive(Clone, Debug)]
pub struct NewFileRecord {
    pub id: Uuid,
    pub filename: String,
    pub storage_key: String,
    pub content_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewFileRecord {
    /// View this input as the record it will become once inserted.
    pub fn into_record(self) -> FileRecord {
        FileRecord {
            id: self.id,
            filename: self.filename,
            storage_key: self.storage_key,
            content_type: self.content_type,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}
