use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};

use crate::transcoder::error::TranscodeError;
use crate::transcoder::job::TranscodeJob;
use crate::transcoder::manifest::MASTER_PLAYLIST;

/// Filesystem layout: uploads land in `upload_dir/{id}_{name}`, renditions in
/// `hls_dir/{id}/`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    pub upload_dir: PathBuf,
    pub hls_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(upload_dir: impl Into<PathBuf>, hls_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            hls_dir: hls_dir.into(),
        }
    }

    pub async fn ensure_dirs(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::create_dir_all(&self.hls_dir).await?;
        info!(
            "📁 Storage ready (uploads: {}, hls: {})",
            self.upload_dir.display(),
            self.hls_dir.display()
        );
        Ok(())
    }

    pub fn input_path(&self, job_id: &str, file_name: &str) -> Result<PathBuf, TranscodeError> {
        let name = sanitize_file_name(file_name)
            .ok_or_else(|| TranscodeError::InvalidFileName(file_name.to_string()))?;
        Ok(self.upload_dir.join(format!("{job_id}_{name}")))
    }

    pub fn output_dir(&self, job_id: &str) -> PathBuf {
        self.hls_dir.join(job_id)
    }

    pub async fn create_output_dir(&self, job_id: &str) -> io::Result<PathBuf> {
        let dir = self.output_dir(job_id);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Path of a file inside a job's output directory, if it exists. Both
    /// segments must be plain names; anything that could step outside the
    /// directory resolves to `None`.
    pub async fn resolve(&self, job_id: &str, file_name: &str) -> Option<PathBuf> {
        if !is_plain_segment(job_id) || !is_plain_segment(file_name) {
            return None;
        }

        let path = self.hls_dir.join(job_id).join(file_name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(path),
            _ => None,
        }
    }

    /// Job ids whose output directory holds a master manifest, sorted.
    pub async fn list_completed(&self) -> io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.hls_dir).await?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let Ok(id) = entry.file_name().into_string() else {
                continue;
            };
            if tokio::fs::try_exists(entry.path().join(MASTER_PLAYLIST))
                .await
                .unwrap_or(false)
            {
                ids.push(id);
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Removes the job's stored input and output directory. Missing paths are
    /// not an error.
    pub async fn discard(&self, job: &TranscodeJob) {
        if let Err(e) = tokio::fs::remove_file(&job.input_path).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove {}: {}", job.input_path.display(), e);
            }
        }
        if let Err(e) = tokio::fs::remove_dir_all(&job.output_dir).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove {}: {}", job.output_dir.display(), e);
            }
        }
    }
}

/// Reduces an uploaded file name to its final component.
fn sanitize_file_name(file_name: &str) -> Option<String> {
    let normalized = file_name.replace('\\', "/");
    let name = Path::new(&normalized).file_name()?.to_str()?.trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

fn is_plain_segment(segment: &str) -> bool {
    if segment.is_empty() || segment.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
