use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use wallsmith_core::settings::download::DownloadSettings;
use wallsmith_core::utils::slugify::cache_file_name;

/// Fetches wallpapers into the local cache directory.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    settings: DownloadSettings,
}

impl Downloader {
    pub fn new(settings: &DownloadSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    pub fn target_path(&self, url: &Url) -> PathBuf {
        Path::new(&self.settings.cache_dir).join(cache_file_name(url.path()))
    }

    /// Downloads `url` into the cache, streaming the body to disk. Returns
    /// the cached path directly when reuse is enabled and the file exists.
    pub async fn download(&self, url: &Url) -> anyhow::Result<PathBuf> {
        let target = self.target_path(url);

        if self.settings.reuse_cached && tokio::fs::try_exists(&target).await.unwrap_or(false) {
            debug!("Using cached wallpaper {}", target.display());
            return Ok(target);
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create cache dir {}", parent.display()))?;
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?
            .error_for_status()?;

        // Write to a part file first so a torn download never looks cached.
        let part = target.with_extension("part");
        let mut file = tokio::fs::File::create(&part)
            .await
            .with_context(|| format!("Failed to create {}", part.display()))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&part, &target).await?;
        info!("Downloaded {} to {}", url, target.display());
        Ok(target)
    }
}
