use crate::config::settings::AppConfig;
use crate::infrastructure::storage::local::LocalStorage;
use crate::transcoder::job::TranscodeService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: LocalStorage,
    pub transcoder: TranscodeService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let storage = LocalStorage::new(config.upload_dir.clone(), config.hls_dir.clone());
        let transcoder = TranscodeService::new(&config, storage.clone());

        Self {
            config,
            storage,
            transcoder,
        }
    }
}
