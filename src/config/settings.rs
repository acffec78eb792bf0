use std::path::PathBuf;

use thiserror::Error;

use crate::config::env::{self, EnvKey};
use crate::transcoder::plan::EncodeSettings;
use crate::transcoder::rendition::{LadderError, RenditionLadder};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid HLS_RENDITIONS: {0}")]
    Renditions(#[from] LadderError),
    #[error("HLS_SEGMENT_SECONDS must be at least 1 second")]
    SegmentSeconds,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub upload_dir: PathBuf,
    pub hls_dir: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub renditions: RenditionLadder,
    pub segment_seconds: u32,
    pub video_codec: String,
    pub audio_codec: String,
    pub max_upload_bytes: usize,
    pub verify_outputs: bool,
    pub cleanup_on_failure: bool,
    pub public_base_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            upload_dir: PathBuf::from("uploads"),
            hls_dir: PathBuf::from("hls"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            renditions: RenditionLadder::default(),
            segment_seconds: 5,
            video_codec: "h264".to_string(),
            audio_codec: "aac".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            verify_outputs: true,
            cleanup_on_failure: false,
            public_base_url: None,
        }
    }
}

impl AppConfig {
    /// Builds the configuration from the process environment, falling back to
    /// the defaults for anything unset.
    pub fn new() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let renditions = match env::get(EnvKey::Renditions) {
            Ok(raw) => raw.parse::<RenditionLadder>()?,
            Err(_) => defaults.renditions,
        };

        let segment_seconds = env::get_parsed(EnvKey::SegmentSeconds, defaults.segment_seconds);
        if segment_seconds == 0 {
            return Err(ConfigError::SegmentSeconds);
        }

        Ok(Self {
            server_host: env::get_or(EnvKey::ServerHost, &defaults.server_host),
            server_port: env::get_parsed(EnvKey::ServerPort, defaults.server_port),
            upload_dir: env::get(EnvKey::UploadDir)
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            hls_dir: env::get(EnvKey::HlsDir)
                .map(PathBuf::from)
                .unwrap_or(defaults.hls_dir),
            ffmpeg_path: env::get(EnvKey::FfmpegPath)
                .map(PathBuf::from)
                .unwrap_or(defaults.ffmpeg_path),
            ffprobe_path: env::get(EnvKey::FfprobePath)
                .map(PathBuf::from)
                .unwrap_or(defaults.ffprobe_path),
            renditions,
            segment_seconds,
            video_codec: env::get_or(EnvKey::VideoCodec, &defaults.video_codec),
            audio_codec: env::get_or(EnvKey::AudioCodec, &defaults.audio_codec),
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadBytes, defaults.max_upload_bytes),
            verify_outputs: env::get_parsed(EnvKey::VerifyOutputs, defaults.verify_outputs),
            cleanup_on_failure: env::get_parsed(
                EnvKey::CleanupOnFailure,
                defaults.cleanup_on_failure,
            ),
            public_base_url: env::get(EnvKey::PublicBaseUrl)
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
        })
    }

    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            segment_seconds: self.segment_seconds,
            video_codec: self.video_codec.clone(),
            audio_codec: self.audio_codec.clone(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
