//! HTTP handlers for upload, metadata, listing, and download.
//! Thin glue only: retention parsing and header assembly live here, every
//! storage decision lives in the services.

use crate::{errors::AppError, state::AppState};
use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Response envelope for a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// POST `/api/upload` — multipart form with a `file` part and an
/// `expiration` part holding the retention in days.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file_part: Option<(String, Option<String>, Bytes)> = None;
    let mut expiration_raw: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(format!("malformed multipart body: {err}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("file").to_string();
                let content_type = field.content_type().map(|ct| ct.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::bad_request(format!("reading file part: {err}")))?;
                file_part = Some((filename, content_type, bytes));
            }
            Some("expiration") => {
                expiration_raw = Some(field.text().await.map_err(|err| {
                    AppError::bad_request(format!("reading expiration part: {err}"))
                })?);
            }
            _ => {}
        }
    }

    let Some((filename, content_type, payload)) = file_part else {
        return Err(AppError::bad_request("no file was provided"));
    };
    let retention_days = expiration_raw
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .parse::<i64>()
        .map_err(|_| AppError::bad_request("expiration must be a positive number of days"))?;

    let receipt = state
        .upload
        .upload(&filename, content_type, payload, retention_days)
        .await?;

    Ok(Json(UploadResponse {
        success: true,
        message: "file stored".into(),
        url: format!("{}/api/download/{}", state.public_url, receipt.id),
        expires_at: receipt.expires_at,
    }))
}

/// GET `/api/files` — every record, newest first.
pub async fn list_files(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let records = state.resolve.list().await?;
    Ok(Json(records))
}

/// GET `/api/files/{id}` — the raw record, or 404. No expiry check, so an
/// expired file's metadata stays visible.
pub async fn get_file_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.resolve.metadata(parse_file_id(&id)?).await?;
    Ok(Json(record))
}

/// GET `/api/download/{id}` — the payload with `Content-Disposition`,
/// `Content-Type`, and `Content-Length` set from the resolved record.
/// 404 when unknown, 403 when expired, 500 when the blob has vanished.
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let payload = state.resolve.download(parse_file_id(&id)?).await?;

    let mut response = Response::new(Body::from(payload.bytes));
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();

    let disposition = format!(
        "attachment; filename=\"{}\"",
        payload.filename.replace(['"', '\r', '\n'], "_")
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&payload.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from_str(&payload.length.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("0")),
    );

    Ok(response)
}

/// Ids come straight out of URL paths. One that does not parse can never
/// have been issued, so it gets the same 404 as an unknown id rather than
/// a 400.
fn parse_file_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("file not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_map_to_not_found() {
        for raw in ["not-a-uuid", "", "1234", "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz"] {
            let err = parse_file_id(raw).unwrap_err();
            assert_eq!(err.status, StatusCode::NOT_FOUND, "input {raw:?}");
        }
    }

    #[test]
    fn well_formed_ids_parse() {
        let id = Uuid::new_v4();
        assert_eq!(parse_file_id(&id.to_string()).unwrap(), id);
    }
}
