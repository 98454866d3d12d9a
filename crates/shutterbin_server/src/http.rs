//! HTTP layer: routes, wire types, and error mapping.
//!
//! Thin wrappers over [`MediaService`]; every request passes through the
//! sweep middleware first, so no handler ever observes storage accounted
//! for expired data.

use crate::{ExpirationSweeper, MediaService};
use axum::{
    Json, Router,
    extract::{ConnectInfo, DefaultBodyLimit, Multipart, Path, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use shutterbin_core::{Clock, MediaKind, MediaRecord};
use shutterbin_error::{
    MediaError, MediaErrorKind, QuotaErrorKind, ServerError, ServerErrorKind, ShutterbinError,
    ShutterbinErrorKind,
};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Shared state behind every route.
#[derive(Clone)]
pub struct AppState {
    service: Arc<MediaService>,
    sweeper: Arc<ExpirationSweeper>,
    clock: Arc<dyn Clock>,
    upload_body_limit: usize,
}

impl AppState {
    /// Bundle the service stack for the router.
    pub fn new(
        service: Arc<MediaService>,
        sweeper: Arc<ExpirationSweeper>,
        clock: Arc<dyn Clock>,
        upload_body_limit: usize,
    ) -> Self {
        Self {
            service,
            sweeper,
            clock,
            upload_body_limit,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let upload_body_limit = state.upload_body_limit;

    Router::new()
        .route("/api/upload", post(upload_media))
        .route("/api/media", get(list_media))
        .route("/media/:id", get(serve_media))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            sweep_expired,
        ))
        .layer(DefaultBodyLimit::max(upload_body_limit))
        .with_state(state)
}

/// Run the expiration sweep before handling any request.
///
/// Fails closed: if the sweep cannot complete, the request is rejected
/// rather than served against stale accounting.
async fn sweep_expired(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let now = state.clock.now().naive_utc();
    match state.sweeper.sweep(now).await {
        Ok(_) => next.run(request).await,
        Err(err) => ApiError(err).into_response(),
    }
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    id: i64,
    url: String,
}

#[derive(Debug, Serialize)]
struct MediaListEntry {
    id: i64,
    #[serde(rename = "type")]
    kind: String,
    url: String,
    expiration_time: chrono::NaiveDateTime,
}

impl From<&MediaRecord> for MediaListEntry {
    fn from(record: &MediaRecord) -> Self {
        Self {
            id: record.id,
            kind: record.media_kind.as_str().to_string(),
            url: media_url(record.id),
            expiration_time: record.expires_at,
        }
    }
}

fn media_url(id: i64) -> String {
    format!("/media/{id}")
}

async fn upload_media(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut data = None;
    let mut kind_label = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("file") => data = Some(field.bytes().await.map_err(multipart_error)?),
            Some("type") => kind_label = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let data = data.ok_or_else(|| bad_request("No file provided"))?;
    let label = kind_label.unwrap_or_else(|| "image".to_string());
    let kind = MediaKind::from_str(&label)
        .map_err(|_| ApiError(MediaError::new(MediaErrorKind::UnknownKind(label)).into()))?;

    let record = state
        .service
        .upload(&addr.ip().to_string(), kind, &data)
        .await?;

    Ok(Json(UploadResponse {
        id: record.id,
        url: media_url(record.id),
    }))
}

async fn list_media(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<Vec<MediaListEntry>>, ApiError> {
    let records = state.service.list_for_owner(&addr.ip().to_string()).await?;
    Ok(Json(records.iter().map(MediaListEntry::from).collect()))
}

async fn serve_media(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let (_record, data) = state.service.serve(id).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], data).into_response())
}

fn bad_request(message: &str) -> ApiError {
    ApiError(ServerError::new(ServerErrorKind::BadRequest(message.to_string())).into())
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError(ServerError::new(ServerErrorKind::Multipart(err.to_string())).into())
}

/// Response wrapper mapping service errors onto HTTP statuses.
struct ApiError(ShutterbinError);

impl From<ShutterbinError> for ApiError {
    fn from(err: ShutterbinError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0.kind() {
            ShutterbinErrorKind::Quota(e) => match &e.kind {
                QuotaErrorKind::Exceeded { .. } => (
                    StatusCode::BAD_REQUEST,
                    "Storage quota exceeded".to_string(),
                ),
                QuotaErrorKind::FileTooLarge { .. } => {
                    (StatusCode::PAYLOAD_TOO_LARGE, e.kind.to_string())
                }
            },
            ShutterbinErrorKind::Media(e) => match &e.kind {
                MediaErrorKind::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "Media not found".to_string())
                }
                MediaErrorKind::Expired(_) => (StatusCode::GONE, "Media has expired".to_string()),
                MediaErrorKind::UnknownKind(_) => (StatusCode::BAD_REQUEST, e.kind.to_string()),
            },
            ShutterbinErrorKind::Storage(e) if e.is_not_found() => {
                (StatusCode::NOT_FOUND, "Media not found".to_string())
            }
            ShutterbinErrorKind::Server(e) => match &e.kind {
                ServerErrorKind::Bind(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
                _ => (StatusCode::BAD_REQUEST, e.kind.to_string()),
            },
            other => {
                tracing::error!(error = %other, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
