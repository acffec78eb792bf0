use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tracing::{error, info};

use crate::transcoder::error::TranscodeError;
use crate::transcoder::plan::EncodePlan;

/// Runs an [`EncodePlan`] through the `ffmpeg` binary and waits for it.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg_path: PathBuf,
}

impl FfmpegEncoder {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    /// A zero exit status is the only success criterion here; output files
    /// are not inspected.
    pub async fn execute(&self, plan: &EncodePlan) -> Result<(), TranscodeError> {
        let started = Instant::now();
        info!(
            "🎬 Encoding {} renditions into {}",
            plan.renditions().len(),
            plan.output_dir().display()
        );

        let output = Command::new(&self.ffmpeg_path)
            .args(plan.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TranscodeError::Encode {
                diagnostic: format!("failed to start {}: {}", self.ffmpeg_path.display(), e),
            })?;

        if !output.status.success() {
            let diagnostic = String::from_utf8_lossy(&output.stderr).into_owned();
            error!("❌ ffmpeg exited with {}", output.status);
            return Err(TranscodeError::Encode { diagnostic });
        }

        info!("✅ Encode finished in {:.1?}", started.elapsed());
        Ok(())
    }
}
