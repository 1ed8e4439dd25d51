use serde::{Deserialize, Serialize};

/// Configuration for the wallpaper downloader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Directory downloaded wallpapers are stored in.
    pub cache_dir: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Skip the download when the target file already exists in the cache.
    pub reuse_cached: bool,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            cache_dir: "/tmp/wallsmith".to_string(),
            timeout_secs: 30,
            reuse_cached: true,
        }
    }
}
