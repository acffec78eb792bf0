use std::path::Path;

use anyhow::{Context, Result};
use axum::http::{HeaderMap, header};

use super::dto::VideoEntry;
use crate::state::AppState;
use crate::transcoder::job::master_url;

pub const HLS_PLAYLIST_MIME: &str = "application/vnd.apple.mpegurl";
pub const MPEG_TS_MIME: &str = "video/MP2T";

pub struct VideoService;

impl VideoService {
    pub async fn list_videos(state: &AppState, base_url: &str) -> Result<Vec<VideoEntry>> {
        let ids = state
            .storage
            .list_completed()
            .await
            .with_context(|| format!("failed to scan {}", state.storage.hls_dir.display()))?;

        Ok(ids
            .into_iter()
            .map(|video_id| VideoEntry {
                master_url: format!("{}{}", base_url, master_url(&video_id)),
                video_id,
            })
            .collect())
    }

    /// Scheme and authority used to make listing URLs absolute. Prefers the
    /// configured public URL, then the request's `Host` header.
    pub fn base_url(configured: Option<&str>, headers: &HeaderMap) -> String {
        if let Some(url) = configured {
            return url.trim_end_matches('/').to_string();
        }

        let Some(host) = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .filter(|h| !h.is_empty())
        else {
            return String::new();
        };

        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("http");

        format!("{scheme}://{host}")
    }

    pub fn content_type_for(file_name: &str) -> String {
        if file_name.ends_with(".m3u8") {
            HLS_PLAYLIST_MIME.to_string()
        } else if file_name.ends_with(".ts") {
            MPEG_TS_MIME.to_string()
        } else {
            mime_guess::from_path(Path::new(file_name))
                .first_or_octet_stream()
                .to_string()
        }
    }
}
