//! Upload-to-HLS job orchestration: store the upload, probe it, encode every
//! rendition in one ffmpeg run, then write the master manifest.

use std::path::PathBuf;

use bytes::Bytes;
use futures_util::Stream;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::common::upload::stream_to_file;
use crate::config::settings::AppConfig;
use crate::infrastructure::media::ffmpeg::FfmpegEncoder;
use crate::infrastructure::media::ffprobe::{AudioProbe, FfprobeProber};
use crate::infrastructure::storage::local::LocalStorage;
use crate::transcoder::error::TranscodeError;
use crate::transcoder::manifest::{MASTER_PLAYLIST, MasterManifest};
use crate::transcoder::plan::{EncodePlan, EncodeSettings};
use crate::transcoder::rendition::RenditionLadder;

#[derive(Debug, Clone)]
pub struct TranscodeJob {
    pub id: String,
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
}

impl TranscodeJob {
    pub fn new(storage: &LocalStorage, file_name: &str) -> Result<Self, TranscodeError> {
        let id = Uuid::new_v4().to_string();
        let input_path = storage.input_path(&id, file_name)?;
        let output_dir = storage.output_dir(&id);

        Ok(Self {
            id,
            input_path,
            output_dir,
        })
    }

    pub fn master_url(&self) -> String {
        master_url(&self.id)
    }
}

/// Path under which a job's master manifest is served.
pub fn master_url(job_id: &str) -> String {
    format!("/hls/{job_id}/{MASTER_PLAYLIST}")
}

#[derive(Debug, Clone)]
pub struct CompletedJob {
    pub id: String,
    pub master_url: String,
    pub master_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct TranscodeService {
    storage: LocalStorage,
    prober: FfprobeProber,
    encoder: FfmpegEncoder,
    ladder: RenditionLadder,
    settings: EncodeSettings,
    verify_outputs: bool,
    cleanup_on_failure: bool,
}

impl TranscodeService {
    pub fn new(config: &AppConfig, storage: LocalStorage) -> Self {
        Self {
            storage,
            prober: FfprobeProber::new(config.ffprobe_path.clone()),
            encoder: FfmpegEncoder::new(config.ffmpeg_path.clone()),
            ladder: config.renditions.clone(),
            settings: config.encode_settings(),
            verify_outputs: config.verify_outputs,
            cleanup_on_failure: config.cleanup_on_failure,
        }
    }

    /// Runs one upload to completion. A failed job leaves its files on disk
    /// unless cleanup on failure is enabled.
    ///
    /// The body is consumed by the caller's future. Everything after it runs
    /// on its own task, so the job still reaches its manifest (or its cleanup)
    /// if the caller is dropped mid-encode.
    pub async fn run<S, E>(&self, file_name: &str, body: S) -> Result<CompletedJob, TranscodeError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Into<TranscodeError>,
    {
        let job = TranscodeJob::new(&self.storage, file_name)?;
        info!("📦 Job {} accepted for '{}'", job.id, file_name);

        if let Err(e) = stream_to_file(&job.input_path, body).await {
            return Err(self.fail(&job, e).await);
        }

        let service = self.clone();
        let handle = tokio::spawn(async move {
            match service.process(&job).await {
                Ok(done) => {
                    info!("✅ Job {} completed", job.id);
                    Ok(done)
                }
                Err(e) => Err(service.fail(&job, e).await),
            }
        });

        handle.await?
    }

    async fn fail(&self, job: &TranscodeJob, e: TranscodeError) -> TranscodeError {
        error!("❌ Job {} failed: {}", job.id, e);
        if self.cleanup_on_failure {
            self.storage.discard(job).await;
        }
        e
    }

    async fn process(&self, job: &TranscodeJob) -> Result<CompletedJob, TranscodeError> {
        self.storage.create_output_dir(&job.id).await?;

        let audio = self.prober.probe_audio(&job.input_path).await;
        if audio == AudioProbe::Unknown {
            warn!("Job {}: audio probe inconclusive, encoding video only", job.id);
        }

        let plan = EncodePlan::build(
            &job.input_path,
            &job.output_dir,
            audio.has_audio(),
            &self.ladder,
            &self.settings,
        );
        self.encoder.execute(&plan).await?;

        if self.verify_outputs {
            verify_outputs(&plan).await?;
        }

        let master_path = MasterManifest::from_ladder(&self.ladder)
            .write(&job.output_dir)
            .await?;

        Ok(CompletedJob {
            id: job.id.clone(),
            master_url: job.master_url(),
            master_path,
        })
    }
}

/// Confirms every rendition playlist the plan promised is on disk.
pub async fn verify_outputs(plan: &EncodePlan) -> Result<(), TranscodeError> {
    for playlist in plan.expected_playlists() {
        if !tokio::fs::try_exists(&playlist).await.unwrap_or(false) {
            return Err(TranscodeError::MissingOutput(playlist));
        }
    }
    Ok(())
}
