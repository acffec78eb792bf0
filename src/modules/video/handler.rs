use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::modules::video::dto::*;
use crate::modules::video::service::VideoService;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use tracing::info;

/// Upload a video and transcode it into an HLS rendition set.
/// The request returns once every rendition and the master playlist exist.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Transcoded", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Bad Request"),
        (status = 413, description = "Upload exceeds MAX_UPLOAD_BYTES"),
        (status = 500, description = "Encoder or storage failure")
    ),
    tag = "Video"
)]
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                let status = e.status();
                return ApiError(format!("Invalid multipart body: {}", e.body_text()), status)
                    .into_response();
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => {
                return ApiError("Upload is missing a file name".to_string(), StatusCode::BAD_REQUEST)
                    .into_response();
            }
        };
        info!("Receiving upload: {}", file_name);

        return match state.transcoder.run(&file_name, field).await {
            Ok(job) => ApiSuccess(
                ApiResponse::success(
                    UploadResponse {
                        video_id: job.id,
                        master_url: job.master_url,
                    },
                    "Video transcoded successfully",
                ),
                StatusCode::OK,
            )
            .into_response(),
            Err(e) => ApiError::from(e).into_response(),
        };
    }

    ApiError("No file field found in multipart request".to_string(), StatusCode::BAD_REQUEST)
        .into_response()
}

/// List every video whose master playlist has been written.
#[utoipa::path(
    get,
    path = "/videos",
    responses(
        (status = 200, description = "Completed videos", body = ApiResponse<Vec<VideoEntry>>),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Video"
)]
pub async fn list_videos(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let base_url = VideoService::base_url(state.config.public_base_url.as_deref(), &headers);

    match VideoService::list_videos(&state, &base_url).await {
        Ok(videos) => ApiSuccess(
            ApiResponse::success(videos, "Videos retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(format!("{:#}", e), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

/// Serve a playlist or segment from a video's output directory.
#[utoipa::path(
    get,
    path = "/hls/{video_id}/{filename}",
    params(
        ("video_id" = String, Path, description = "Video ID"),
        ("filename" = String, Path, description = "Playlist or segment file name")
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "File not found")
    ),
    tag = "Video"
)]
pub async fn serve_hls(
    State(state): State<AppState>,
    Path((video_id, filename)): Path<(String, String)>,
) -> impl IntoResponse {
    let not_found = || ApiError("File not found".to_string(), StatusCode::NOT_FOUND).into_response();

    let Some(path) = state.storage.resolve(&video_id, &filename).await else {
        return not_found();
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Failed to open {}: {}", path.display(), e);
            return not_found();
        }
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, VideoService::content_type_for(&filename));

    if let Ok(meta) = file.metadata().await {
        builder = builder.header(header::CONTENT_LENGTH, meta.len());
    }

    let body = Body::from_stream(ReaderStream::new(file));

    builder
        .body(body)
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
