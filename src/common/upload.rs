use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{error, info};

use crate::transcoder::error::TranscodeError;

const WRITE_BUFFER_SIZE: usize = 1024 * 1024;

/// Writes an upload to disk chunk by chunk.
pub struct FileUploader {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl FileUploader {
    pub async fn new(path: &Path) -> Result<Self, TranscodeError> {
        let file = File::create(path).await?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::with_capacity(WRITE_BUFFER_SIZE, file),
            written: 0,
        })
    }

    pub async fn write_chunk(&mut self, chunk: Bytes) -> Result<(), TranscodeError> {
        self.writer.write_all(&chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub async fn finish(mut self) -> Result<u64, TranscodeError> {
        self.writer.flush().await?;
        self.writer.into_inner().sync_all().await?;
        Ok(self.written)
    }

    /// Drops the partially written file.
    pub async fn abort(self) {
        drop(self.writer);
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            error!("Failed to remove partial upload {}: {}", self.path.display(), e);
        }
    }
}

/// Copies `body` into a new file at `path`. A failing stream removes the
/// partial file and surfaces its error as a [`TranscodeError`].
pub async fn stream_to_file<S, E>(path: &Path, mut body: S) -> Result<u64, TranscodeError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<TranscodeError>,
{
    let mut uploader = FileUploader::new(path).await?;

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                let e = e.into();
                error!("Stream error: {}", e);
                uploader.abort().await;
                return Err(e);
            }
        };

        if let Err(e) = uploader.write_chunk(chunk).await {
            error!("Upload error: {}", e);
            uploader.abort().await;
            return Err(e);
        }
    }

    let written = uploader.finish().await?;
    info!("⬆️ Stored {} bytes at {}", written, path.display());
    Ok(written)
}
