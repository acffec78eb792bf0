use utoipa::OpenApi;
use crate::modules::video::dto::{UploadResponse, VideoEntry};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::video::handler::upload_video,
        crate::modules::video::handler::list_videos,
        crate::modules::video::handler::serve_hls,
    ),
    components(
        schemas(
            UploadResponse,
            VideoEntry,
        )
    ),
    tags(
        (name = "Video", description = "Upload, transcode and HLS delivery")
    )
)]
pub struct ApiDoc;
