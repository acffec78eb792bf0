//! Builds the single ffmpeg invocation that produces every rendition.
//!
//! The input is decoded once and split into one branch per rendition, each
//! branch scaled to its fixed size and packaged as a VOD HLS rendition:
//!
//! ```text
//! ffmpeg -i <input> -filter_complex "[0:v]split=3[v1][v2][v3];[v1]scale=w=854:h=480[v1out];..."
//!   -map [v1out] [-map 0:a:0 -c:a aac] -c:v h264 -b:v 1400k -f hls -hls_time 5
//!   -hls_playlist_type vod -hls_segment_filename <dir>/480p_%03d.ts <dir>/480p.m3u8
//!   ...
//! ```

use std::path::{Path, PathBuf};

use crate::transcoder::rendition::{Rendition, RenditionLadder};

/// Encoder knobs shared by every leg of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    pub segment_seconds: u32,
    pub video_codec: String,
    pub audio_codec: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            segment_seconds: 5,
            video_codec: "h264".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EncodePlan {
    args: Vec<String>,
    renditions: Vec<Rendition>,
    output_dir: PathBuf,
}

impl EncodePlan {
    /// Legs are emitted highest rendition first; `has_audio` applies to all
    /// of them.
    pub fn build(
        input: &Path,
        output_dir: &Path,
        has_audio: bool,
        ladder: &RenditionLadder,
        settings: &EncodeSettings,
    ) -> Self {
        let renditions: Vec<Rendition> = ladder.iter().rev().cloned().collect();

        let mut args = vec![
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
            "-filter_complex".to_string(),
            filter_graph(&renditions),
        ];

        for (idx, rendition) in renditions.iter().enumerate() {
            args.push("-map".to_string());
            args.push(format!("[v{}out]", idx + 1));

            if has_audio {
                args.extend([
                    "-map".to_string(),
                    "0:a:0".to_string(),
                    "-c:a".to_string(),
                    settings.audio_codec.clone(),
                ]);
            }

            args.extend([
                "-c:v".to_string(),
                settings.video_codec.clone(),
                "-b:v".to_string(),
                rendition.bitrate_arg(),
                "-f".to_string(),
                "hls".to_string(),
                "-hls_time".to_string(),
                settings.segment_seconds.to_string(),
                "-hls_playlist_type".to_string(),
                "vod".to_string(),
                "-hls_segment_filename".to_string(),
                output_dir
                    .join(rendition.segment_pattern())
                    .to_string_lossy()
                    .into_owned(),
                output_dir
                    .join(rendition.playlist_file())
                    .to_string_lossy()
                    .into_owned(),
            ]);
        }

        Self {
            args,
            renditions,
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn renditions(&self) -> &[Rendition] {
        &self.renditions
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Rendition playlists the encoder is expected to leave behind.
    pub fn expected_playlists(&self) -> Vec<PathBuf> {
        self.renditions
            .iter()
            .map(|r| self.output_dir.join(r.playlist_file()))
            .collect()
    }
}

fn filter_graph(renditions: &[Rendition]) -> String {
    let labels: String = (1..=renditions.len()).map(|i| format!("[v{i}]")).collect();
    let mut graph = format!("[0:v]split={}{}", renditions.len(), labels);

    for (idx, rendition) in renditions.iter().enumerate() {
        graph.push_str(&format!(
            ";[v{n}]scale=w={w}:h={h}[v{n}out]",
            n = idx + 1,
            w = rendition.width,
            h = rendition.height,
        ));
    }

    graph
}
