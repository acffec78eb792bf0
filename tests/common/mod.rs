//! Shared test harness for integration tests.
//!
//! [`TestHarness`] builds the full router over a temporary storage root, with
//! `ffmpeg` and `ffprobe` replaced by small shell scripts so the pipeline can
//! run without a real encoder.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

use hls_transcoder::app::create_app;
use hls_transcoder::config::settings::AppConfig;
use hls_transcoder::state::AppState;

pub const ARGS_FILE: &str = "ffmpeg_args.txt";

/// Records its arguments, then writes every playlist it was asked for plus a
/// first segment for each segment pattern.
pub const FFMPEG_OK: &str = r#"printf '%s\n' "$@" > "$(dirname "$0")/ffmpeg_args.txt"
for arg in "$@"; do
  case "$arg" in
    *.m3u8) printf '#EXTM3U\n#EXT-X-PLAYLIST-TYPE:VOD\n#EXTINF:5.0,\nseg.ts\n#EXT-X-ENDLIST\n' > "$arg" ;;
    *_%03d.ts) printf 'segment' > "$(printf "$arg" 0)" ;;
  esac
done
exit 0"#;

/// Same outputs as [`FFMPEG_OK`], written after a one second pause.
pub const FFMPEG_SLOW: &str = r#"sleep 1
printf '%s\n' "$@" > "$(dirname "$0")/ffmpeg_args.txt"
for arg in "$@"; do
  case "$arg" in
    *.m3u8) printf '#EXTM3U\n#EXT-X-PLAYLIST-TYPE:VOD\n#EXTINF:5.0,\nseg.ts\n#EXT-X-ENDLIST\n' > "$arg" ;;
    *_%03d.ts) printf 'segment' > "$(printf "$arg" 0)" ;;
  esac
done
exit 0"#;

pub const FFMPEG_FAIL: &str = r#"printf '%s\n' "$@" > "$(dirname "$0")/ffmpeg_args.txt"
echo "input.mp4: Invalid data found when processing input" >&2
exit 1"#;

/// Exits cleanly without producing anything.
pub const FFMPEG_SILENT: &str = "exit 0";

pub const FFPROBE_AUDIO: &str = r#"echo '{"programs": [], "streams": [{"index": 1}]}'"#;
pub const FFPROBE_NO_AUDIO: &str = r#"echo '{"programs": [], "streams": []}'"#;
pub const FFPROBE_BROKEN: &str = r#"echo "moov atom not found" >&2
exit 1"#;

pub struct FakeTools {
    pub ffmpeg: &'static str,
    /// `None` points the config at a binary that does not exist.
    pub ffprobe: Option<&'static str>,
}

impl FakeTools {
    pub fn new(ffmpeg: &'static str, ffprobe: &'static str) -> Self {
        Self {
            ffmpeg,
            ffprobe: Some(ffprobe),
        }
    }
}

pub struct TestHarness {
    pub root: TempDir,
    pub config: AppConfig,
    pub app: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}

impl TestHarness {
    pub async fn new(tools: FakeTools) -> Self {
        Self::with_config(tools, |_| {}).await
    }

    pub async fn with_config(tools: FakeTools, tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let root = tempfile::tempdir().expect("failed to create temp dir");
        let bin = root.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();

        let ffmpeg_path = write_script(&bin, "ffmpeg", tools.ffmpeg);
        let ffprobe_path = match tools.ffprobe {
            Some(body) => write_script(&bin, "ffprobe", body),
            None => bin.join("ffprobe-not-installed"),
        };

        let mut config = AppConfig {
            upload_dir: root.path().join("uploads"),
            hls_dir: root.path().join("hls"),
            ffmpeg_path,
            ffprobe_path,
            ..AppConfig::default()
        };
        tweak(&mut config);

        let state = AppState::new(config.clone());
        state
            .storage
            .ensure_dirs()
            .await
            .expect("failed to create storage dirs");
        let app = create_app(state);

        Self { root, config, app }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn upload(&self, file_name: &str, content: &[u8]) -> TestResponse {
        self.send(multipart_request("/upload", "file", file_name, content))
            .await
    }

    /// Arguments the fake ffmpeg received on its last run.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let path = self.root.path().join("bin").join(ARGS_FILE);
        std::fs::read_to_string(path)
            .expect("ffmpeg was not invoked")
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn hls_dir(&self) -> &Path {
        &self.config.hls_dir
    }

    pub fn upload_dir(&self) -> &Path {
        &self.config.upload_dir
    }

    /// Lays out a finished job directly on disk.
    pub fn seed_job(&self, id: &str, files: &[(&str, &[u8])]) -> PathBuf {
        let dir = self.hls_dir().join(id);
        std::fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            std::fs::write(dir.join(name), content).unwrap();
        }
        dir
    }
}

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub fn multipart_request(uri: &str, field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    let boundary = "hls-transcoder-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: video/mp4\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::post(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}
