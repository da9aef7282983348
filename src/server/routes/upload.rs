use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, post},
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::auth::RequireAdmin;
use crate::media::{MAX_FILE_SIZE, MAX_FILES_PER_UPLOAD, MAX_VIDEO_FILES, MediaKind};
use crate::server::AppState;
use crate::server::response::{ApiError, StoreResultExt};
use crate::types::{Photo, Video, VideoType};

use super::photos::DEFAULT_CATEGORY;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload/single", post(upload_single))
        .route("/upload/multiple", post(upload_multiple))
        .route("/upload/photos", post(upload_photos))
        .route("/upload/videos", post(upload_videos))
        .route("/upload/{filename}", delete(delete_file))
}

struct UploadedFile {
    original_name: String,
    data: Vec<u8>,
}

/// Multipart form contents: file parts plus optional text metadata.
#[derive(Default)]
struct UploadForm {
    files: Vec<UploadedFile>,
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    team_id: Option<String>,
    match_id: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" | "files" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;

                if data.len() > MAX_FILE_SIZE {
                    return Err(ApiError::bad_request(format!(
                        "File too large: {original_name}"
                    )));
                }

                form.files.push(UploadedFile {
                    original_name,
                    data: data.to_vec(),
                });
            }
            "title" => form.title = read_text(field).await?,
            "description" => form.description = read_text(field).await?,
            "category" => form.category = read_text(field).await?,
            "team_id" => form.team_id = read_text(field).await?,
            "match_id" => form.match_id = read_text(field).await?,
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<Option<String>, ApiError> {
    let value = field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid form field: {e}")))?;
    let value = value.trim().to_string();
    Ok((!value.is_empty()).then_some(value))
}

fn require_kind(file: &UploadedFile, expected: MediaKind) -> Result<(), ApiError> {
    match MediaKind::from_filename(&file.original_name) {
        Some(kind) if kind == expected => Ok(()),
        Some(_) | None => Err(ApiError::bad_request(format!(
            "File type not allowed: {}",
            file.original_name
        ))),
    }
}

/// Title for a stored file when the form did not provide one.
fn default_title(original_name: &str) -> String {
    std::path::Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(original_name)
        .to_string()
}

fn check_allowed(file: &UploadedFile) -> Result<(), ApiError> {
    if MediaKind::from_filename(&file.original_name).is_none() {
        return Err(ApiError::bad_request(format!(
            "File type not allowed: {}",
            file.original_name
        )));
    }
    Ok(())
}

/// Writes one file under a generated name. Returns (filename, url).
async fn store_file(
    state: &Arc<AppState>,
    file: &UploadedFile,
) -> Result<(String, String), ApiError> {
    let filename = state.media.unique_filename(&file.original_name);
    state
        .media
        .save(&filename, &file.data)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store upload: {e}");
            ApiError::internal()
        })?;

    let url = state.media.url_for(&filename);
    Ok((filename, url))
}

/// Stores a single file of any accepted type. No gallery record is
/// created; callers reference the URL themselves.
async fn upload_single(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let form = read_form(multipart).await?;
    let file = form
        .files
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::bad_request("No file provided"))?;
    check_allowed(&file)?;

    let (filename, url) = store_file(&state, &file).await?;
    Ok(Json(json!({
        "message": "File uploaded successfully",
        "filename": filename,
        "url": url,
    })))
}

/// Stores a batch of files of any accepted type, without gallery records.
async fn upload_multiple(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let form = read_form(multipart).await?;

    if form.files.is_empty() {
        return Err(ApiError::bad_request("No file provided"));
    }
    if form.files.len() > MAX_FILES_PER_UPLOAD {
        return Err(ApiError::bad_request(format!(
            "At most {MAX_FILES_PER_UPLOAD} files per upload"
        )));
    }
    for file in &form.files {
        check_allowed(file)?;
    }

    let mut stored = Vec::with_capacity(form.files.len());
    for file in &form.files {
        let (filename, url) = store_file(&state, file).await?;
        stored.push(json!({ "filename": filename, "url": url }));
    }

    Ok(Json(json!({
        "message": "Files uploaded successfully",
        "files": stored,
    })))
}

/// Stores image files and creates a gallery photo per file.
async fn upload_photos(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let form = read_form(multipart).await?;

    if form.files.is_empty() {
        return Err(ApiError::bad_request("No file provided"));
    }
    if form.files.len() > MAX_FILES_PER_UPLOAD {
        return Err(ApiError::bad_request(format!(
            "At most {MAX_FILES_PER_UPLOAD} files per upload"
        )));
    }
    for file in &form.files {
        require_kind(file, MediaKind::Image)?;
    }
    if let Some(team_id) = &form.team_id {
        state
            .store
            .get_team(team_id)
            .api_err()?
            .map(|_| ())
            .ok_or_else(|| ApiError::bad_request("team_id does not reference a team"))?;
    }

    let mut photos = Vec::with_capacity(form.files.len());
    for file in &form.files {
        let (_filename, url) = store_file(&state, file).await?;

        let photo = Photo {
            id: Uuid::new_v4().to_string(),
            title: form
                .title
                .clone()
                .unwrap_or_else(|| default_title(&file.original_name)),
            description: form.description.clone(),
            category: form
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            url,
            team_id: form.team_id.clone(),
            created_at: Utc::now(),
        };
        state.store.create_photo(&photo).api_err()?;
        photos.push(photo);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Photos uploaded successfully",
            "photos": photos,
        })),
    ))
}

/// Stores video files and creates a published gallery video per file.
async fn upload_videos(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let form = read_form(multipart).await?;

    if form.files.is_empty() {
        return Err(ApiError::bad_request("No file provided"));
    }
    if form.files.len() > MAX_VIDEO_FILES {
        return Err(ApiError::bad_request(format!(
            "At most {MAX_VIDEO_FILES} files per upload"
        )));
    }
    for file in &form.files {
        require_kind(file, MediaKind::Video)?;
    }
    if let Some(team_id) = &form.team_id {
        state
            .store
            .get_team(team_id)
            .api_err()?
            .map(|_| ())
            .ok_or_else(|| ApiError::bad_request("team_id does not reference a team"))?;
    }
    if let Some(match_id) = &form.match_id {
        state
            .store
            .get_match(match_id)
            .api_err()?
            .map(|_| ())
            .ok_or_else(|| ApiError::bad_request("match_id does not reference a match"))?;
    }

    let mut videos = Vec::with_capacity(form.files.len());
    for file in &form.files {
        let (_filename, url) = store_file(&state, file).await?;

        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4().to_string(),
            title: form
                .title
                .clone()
                .unwrap_or_else(|| default_title(&file.original_name)),
            description: form.description.clone(),
            url,
            video_type: VideoType::Upload,
            thumbnail_url: None,
            category: form
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            duration: None,
            published: true,
            team_id: form.team_id.clone(),
            match_id: form.match_id.clone(),
            created_at: now,
            updated_at: now,
        };
        state.store.create_video(&video).api_err()?;
        videos.push(video);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Videos uploaded successfully",
            "videos": videos,
        })),
    ))
}

/// Removes a stored file by name without touching gallery records.
async fn delete_file(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = state.media.delete(&filename).await.map_err(|e| match e {
        crate::media::MediaError::InvalidFilename => ApiError::bad_request("Invalid filename"),
        other => {
            tracing::error!("Failed to remove file {filename}: {other}");
            ApiError::internal()
        }
    })?;

    if !removed {
        return Err(ApiError::not_found("File not found"));
    }
    Ok(Json(json!({ "message": "File deleted successfully" })))
}
