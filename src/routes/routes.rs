//! Defines routes for the file-sharing API.
//!
//! ## Structure
//! - `POST /api/upload`          — multipart upload (`file` + `expiration` days)
//! - `GET  /api/files`           — list all records, newest first
//! - `GET  /api/files/{id}`      — record metadata (served even after expiry)
//! - `GET  /api/download/{id}`   — payload with disposition/type/length headers
//!
//! Health endpoints (`/healthz`, `/readyz`) are mounted at the root.

use crate::{
    handlers::{
        file_handlers::{download_file, get_file_metadata, list_files, upload_file},
        health_handlers::{healthz, readyz},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build and return the router for all endpoints.
///
/// The router carries shared state ([`AppState`]) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // API endpoints
        .route("/api/upload", post(upload_file))
        .route("/api/files", get(list_files))
        .route("/api/files/{id}", get(get_file_metadata))
        .route("/api/download/{id}", get(download_file))
}
