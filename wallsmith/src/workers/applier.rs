use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use wallsmith_core::apply::ApplyMode;
use wallsmith_core::tasks::task_details::{keys, TaskResult};

use crate::tasks::scheduler::Job;

use super::backend::WallpaperBackend;
use super::downloader::Downloader;

/// The background job behind one apply operation: download the wallpaper,
/// then apply it through the backend. For the external mode the job stops
/// after the download; the handoff flow takes the file from there.
pub struct WallpaperApplier {
    source_url: Url,
    mode: ApplyMode,
    downloader: Arc<Downloader>,
    backend: Arc<dyn WallpaperBackend>,
}

impl WallpaperApplier {
    pub fn new(
        source_url: Url,
        mode: ApplyMode,
        downloader: Arc<Downloader>,
        backend: Arc<dyn WallpaperBackend>,
    ) -> Self {
        Self {
            source_url,
            mode,
            downloader,
            backend,
        }
    }
}

#[async_trait]
impl Job for WallpaperApplier {
    fn describe(&self) -> String {
        format!("apply {} ({})", self.source_url, self.mode)
    }

    async fn run(&self) -> anyhow::Result<TaskResult> {
        let path = self.downloader.download(&self.source_url).await?;

        if !self.mode.is_external() {
            self.backend.set_wallpaper(&path, self.mode).await?;
        }

        Ok(TaskResult::new()
            .with_text(keys::DOWNLOAD_PATH, path.to_string_lossy())
            .with_int(keys::APPLY_OPTION, self.mode.as_int()))
    }
}
