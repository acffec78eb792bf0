use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub video_id: String,
    /// Server-relative path of the master playlist.
    pub master_url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoEntry {
    pub video_id: String,
    /// Absolute URL of the master playlist.
    pub master_url: String,
}
