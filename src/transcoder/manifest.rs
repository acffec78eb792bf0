use std::path::{Path, PathBuf};

use crate::transcoder::error::TranscodeError;
use crate::transcoder::rendition::RenditionLadder;

pub const MASTER_PLAYLIST: &str = "master.m3u8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantEntry {
    pub bandwidth: u64,
    pub resolution: String,
    pub playlist: String,
}

/// Master playlist listing every rendition, lowest bandwidth first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterManifest {
    entries: Vec<VariantEntry>,
}

impl MasterManifest {
    pub fn from_ladder(ladder: &RenditionLadder) -> Self {
        let entries = ladder
            .iter()
            .map(|r| VariantEntry {
                bandwidth: r.bandwidth,
                resolution: r.resolution(),
                playlist: r.playlist_file(),
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[VariantEntry] {
        &self.entries
    }

    pub fn render(&self) -> String {
        let mut out = String::from("#EXTM3U\n");
        for entry in &self.entries {
            out.push_str(&format!(
                "#EXT-X-STREAM-INF:BANDWIDTH={},RESOLUTION={}\n{}\n",
                entry.bandwidth, entry.resolution, entry.playlist
            ));
        }
        out
    }

    /// Writes `master.m3u8` into `output_dir` and returns its path.
    pub async fn write(&self, output_dir: &Path) -> Result<PathBuf, TranscodeError> {
        let path = output_dir.join(MASTER_PLAYLIST);
        tokio::fs::write(&path, self.render())
            .await
            .map_err(TranscodeError::ManifestWrite)?;
        Ok(path)
    }
}
