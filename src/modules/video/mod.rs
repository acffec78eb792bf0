use axum::Router;
use axum::routing::{get, post};
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handler::upload_video))
        .route("/upload/", post(handler::upload_video))
        .route("/videos", get(handler::list_videos))
        .route("/hls/{video_id}/{filename}", get(handler::serve_hls))
}
