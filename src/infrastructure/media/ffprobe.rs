//! Audio detection via the `ffprobe` CLI.
//!
//! Runs `ffprobe -v error -select_streams a -show_entries stream=index -of json`
//! and reports whether any audio stream came back.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Deserialize;
use serde::de::IgnoredAny;
use tokio::process::Command;
use tracing::{debug, warn};

/// Outcome of an audio probe. `Unknown` covers every way the probe itself can
/// fail and is treated as "no audio" by [`AudioProbe::has_audio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioProbe {
    Detected(bool),
    Unknown,
}

impl AudioProbe {
    pub fn has_audio(self) -> bool {
        matches!(self, AudioProbe::Detected(true))
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<IgnoredAny>,
}

#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: PathBuf,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: PathBuf) -> Self {
        Self { ffprobe_path }
    }

    pub async fn probe_audio(&self, input: &Path) -> AudioProbe {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-select_streams",
                "a",
                "-show_entries",
                "stream=index",
                "-of",
                "json",
            ])
            .arg(input)
            .stdin(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                warn!(
                    "ffprobe could not be started ({}): {}, assuming no audio",
                    self.ffprobe_path.display(),
                    e
                );
                return AudioProbe::Unknown;
            }
        };

        if !output.status.success() {
            warn!(
                "ffprobe exited with {} for {}: {}, assuming no audio",
                output.status,
                input.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return AudioProbe::Unknown;
        }

        let result = parse_audio_streams(&String::from_utf8_lossy(&output.stdout));
        debug!("Audio probe for {}: {:?}", input.display(), result);
        result
    }
}

/// Reads ffprobe's JSON report. Anything other than a JSON object is `Unknown`.
pub fn parse_audio_streams(stdout: &str) -> AudioProbe {
    let parsed = serde_json::from_str::<serde_json::Value>(stdout).and_then(|value| {
        if !value.is_object() {
            return Err(<serde_json::Error as serde::de::Error>::custom(format!(
                "expected a JSON object, got {value}"
            )));
        }
        serde_json::from_value::<ProbeOutput>(value)
    });

    match parsed {
        Ok(parsed) => AudioProbe::Detected(!parsed.streams.is_empty()),
        Err(e) => {
            warn!("Unreadable ffprobe output: {}, assuming no audio", e);
            AudioProbe::Unknown
        }
    }
}
