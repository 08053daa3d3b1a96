//! Video asset handlers.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use vshelf_ingest::UploadError;
use vshelf_models::{VideoAsset, VideoId};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart part carrying the video file.
pub const VIDEO_FIELD: &str = "video";

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Create an empty asset owned by the caller.
pub async fn create_video(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateVideoRequest>,
) -> ApiResult<(StatusCode, Json<VideoAsset>)> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title must not be empty"));
    }

    let mut asset = VideoAsset::new(user.user_id, title);
    asset.description = request.description;
    state.assets.insert(&asset).await?;

    info!(video_id = %asset.id, user_id = %user.user_id, "Created video");
    Ok((StatusCode::CREATED, Json(asset)))
}

/// Get a video with a freshly signed URL.
pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    auth: Result<AuthUser, ApiError>,
) -> ApiResult<Json<VideoAsset>> {
    let video_id = parse_video_id(&video_id)?;
    let user = auth?;
    let asset = load_owned(&state, &video_id, &user).await?;

    let signed = state.pipeline.sign_asset(asset).await?;
    Ok(Json(signed))
}

/// Upload the video file for an existing asset.
///
/// Checks run in order: id, token, existence, ownership, file part. Only then
/// does the body reach the pipeline.
pub async fn upload_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    auth: Result<AuthUser, ApiError>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<VideoAsset>> {
    let video_id = parse_video_id(&video_id)?;
    let user = auth?;
    let mut asset = load_owned(&state, &video_id, &user).await?;

    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let field = loop {
        match multipart
            .next_field()
            .await
            .map_err(|e| UploadError::body_read(e.body_text()))?
        {
            Some(field) if field.name() == Some(VIDEO_FIELD) => break field,
            Some(_) => continue,
            None => return Err(UploadError::MissingFile.into()),
        }
    };

    let content_type = field.content_type().unwrap_or_default().to_string();

    let outcome = state
        .pipeline
        .process(video_id, field, &content_type)
        .await
        .inspect_err(|e| warn!(video_id = %video_id, kind = e.kind().as_str(), "Upload failed: {}", e))?;

    asset.attach_video(&outcome.reference);
    state.assets.update(&asset).await?;

    let signed = state.pipeline.sign_asset(asset).await?;
    Ok(Json(signed))
}

fn parse_video_id(raw: &str) -> ApiResult<VideoId> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid video ID"))
}

async fn load_owned(state: &AppState, video_id: &VideoId, user: &AuthUser) -> ApiResult<VideoAsset> {
    let asset = state
        .assets
        .get(video_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    if !asset.is_owned_by(&user.user_id) {
        return Err(ApiError::unauthorized("Not the owner of this video"));
    }

    Ok(asset)
}
