use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerHost,
    ServerPort,
    UploadDir,
    HlsDir,
    FfmpegPath,
    FfprobePath,
    Renditions,
    SegmentSeconds,
    VideoCodec,
    AudioCodec,
    MaxUploadBytes,
    VerifyOutputs,
    CleanupOnFailure,
    PublicBaseUrl,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerHost => "APP_HOST",
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::UploadDir => "UPLOAD_DIR",
            EnvKey::HlsDir => "HLS_DIR",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::FfprobePath => "FFPROBE_PATH",
            EnvKey::Renditions => "HLS_RENDITIONS",
            EnvKey::SegmentSeconds => "HLS_SEGMENT_SECONDS",
            EnvKey::VideoCodec => "VIDEO_CODEC",
            EnvKey::AudioCodec => "AUDIO_CODEC",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
            EnvKey::VerifyOutputs => "VERIFY_OUTPUTS",
            EnvKey::CleanupOnFailure => "CLEANUP_ON_FAILURE",
            EnvKey::PublicBaseUrl => "PUBLIC_BASE_URL",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
