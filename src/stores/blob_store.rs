//! Blob Store Adapter: opaque-key byte storage.
//!
//! The filesystem implementation shards payloads beneath
//! `base_path/{shard}/{shard}/{key}` to keep per-directory file counts low
//! and writes through a temp file with an fsync before the final rename.

use super::{StoreError, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use uuid::Uuid;

const MAX_KEY_LEN: usize = 1024;

/// Contract over an external object store. Keys are opaque strings; the
/// core never lists or deletes blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Durably store `bytes` under `key`, replacing any previous value.
    async fn put(&self, key: &str, bytes: Bytes) -> StoreResult<()>;

    /// Fetch the payload under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>>;
}

/// Local-disk blob store rooted at `base_path`.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    base_path: PathBuf,
}

impl FsBlobStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Basic key validation to avoid trivial path traversal vectors.
    ///
    /// Rejects empty keys, keys that begin with `/`, and keys containing
    /// `..`, backslashes, or control bytes.
    fn ensure_key_safe(key: &str) -> StoreResult<()> {
        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return Err(StoreError::InvalidKey);
        }
        if key.starts_with('/') || key.contains("..") {
            return Err(StoreError::InvalidKey);
        }
        if key
            .bytes()
            .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0')
        {
            return Err(StoreError::InvalidKey);
        }
        Ok(())
    }

    /// Two-level shard identifiers for a key: the first two bytes of
    /// MD5(key) as lowercase hex (00–ff).
    fn shards(key: &str) -> (String, String) {
        let digest = md5::compute(key);
        (format!("{:02x}", digest[0]), format!("{:02x}", digest[1]))
    }

    /// Physical path for a key: `base_path/{shard}/{shard}/{key}`.
    /// Parent directories may not exist yet.
    fn blob_path(&self, key: &str) -> PathBuf {
        let (shard_a, shard_b) = Self::shards(key);
        let mut path = self.base_path.clone();
        path.push(shard_a);
        path.push(shard_b);
        path.push(key);
        path
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: Bytes) -> StoreResult<()> {
        Self::ensure_key_safe(key)?;
        let file_path = self.blob_path(key);
        let parent = file_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| StoreError::Io(io::Error::other("blob path missing parent")))?;
        fs::create_dir_all(&parent).await?;

        // Write via temp file so a half-written payload is never visible
        // under the final key.
        let tmp_path = parent.join(format!(".tmp-{}", Uuid::new_v4()));
        let result = async {
            let mut file = File::create(&tmp_path).await?;
            file.write_all(&bytes).await?;
            file.flush().await?;
            file.sync_all().await?;
            Ok::<_, io::Error>(())
        }
        .await;
        if let Err(err) = result {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(err));
        }

        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(&file_path).await?;
                fs::rename(&tmp_path, &file_path).await?;
            } else {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(StoreError::Io(err));
            }
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>> {
        Self::ensure_key_safe(key)?;
        match fs::read(self.blob_path(key)).await {
            Ok(bytes) => Ok(Some(Bytes::from(bytes))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> FsBlobStore {
        let dir = std::env::temp_dir().join(format!("filedrop-blobs-{}", Uuid::new_v4()));
        FsBlobStore::new(dir)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = temp_store();
        store
            .put("upload/abc-report.txt", Bytes::from_static(b"hello"))
            .await
            .unwrap();
        let got = store.get("upload/abc-report.txt").await.unwrap();
        assert_eq!(got, Some(Bytes::from_static(b"hello")));
    }

    #[tokio::test]
    async fn get_absent_key_is_none() {
        let store = temp_store();
        assert!(store.get("upload/never-written").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_overwrites_existing_key() {
        let store = temp_store();
        store.put("k", Bytes::from_static(b"one")).await.unwrap();
        store.put("k", Bytes::from_static(b"two")).await.unwrap();
        assert_eq!(
            store.get("k").await.unwrap(),
            Some(Bytes::from_static(b"two"))
        );
    }

    #[tokio::test]
    async fn empty_payload_is_accepted() {
        let store = temp_store();
        store.put("empty", Bytes::new()).await.unwrap();
        assert_eq!(store.get("empty").await.unwrap(), Some(Bytes::new()));
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let store = temp_store();
        for key in ["", "/etc/passwd", "a/../b", "a\\b", "a\0b"] {
            let err = store.put(key, Bytes::from_static(b"x")).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey), "key {key:?}");
        }
    }
}
