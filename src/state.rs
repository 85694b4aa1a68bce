//! Shared application state handed to every handler.

use crate::services::{resolve_service::ResolveService, upload_service::UploadService};
use sqlx::SqlitePool;
use std::{path::PathBuf, sync::Arc};

/// Explicitly injected dependencies: the two services own the stores they
/// talk to; the pool and blob directory are kept around for readiness
/// probes only.
#[derive(Clone)]
pub struct AppState {
    pub upload: UploadService,
    pub resolve: ResolveService,
    pub db: Arc<SqlitePool>,
    pub blob_dir: PathBuf,
    /// Base URL minted download links start with, e.g. `http://host:3000`.
    pub public_url: String,
}
