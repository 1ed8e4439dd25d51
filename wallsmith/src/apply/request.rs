use std::sync::Arc;

use tracing::debug;
use url::Url;

use wallsmith_core::apply::ApplyMode;

use crate::tasks::scheduler::WorkRequest;
use crate::workers::applier::WallpaperApplier;
use crate::workers::backend::WallpaperBackend;
use crate::workers::downloader::Downloader;

/// Builds the work request for one apply operation. `None` means there is
/// nothing to do; the session treats it as a silent no-op.
pub trait RequestBuilder: Send + Sync {
    fn build(&self, source_url: &str, mode: ApplyMode) -> Option<WorkRequest>;
}

pub struct ApplyRequestBuilder {
    downloader: Arc<Downloader>,
    backend: Arc<dyn WallpaperBackend>,
}

impl ApplyRequestBuilder {
    pub fn new(downloader: Arc<Downloader>, backend: Arc<dyn WallpaperBackend>) -> Self {
        Self {
            downloader,
            backend,
        }
    }
}

impl RequestBuilder for ApplyRequestBuilder {
    fn build(&self, source_url: &str, mode: ApplyMode) -> Option<WorkRequest> {
        if source_url.trim().is_empty() {
            debug!("No wallpaper url set, nothing to apply");
            return None;
        }
        let url = match Url::parse(source_url) {
            Ok(url) => url,
            Err(err) => {
                debug!("Ignoring invalid wallpaper url '{}': {}", source_url, err);
                return None;
            }
        };

        let job = WallpaperApplier::new(
            url.clone(),
            mode,
            self.downloader.clone(),
            self.backend.clone(),
        );
        Some(WorkRequest::new(url, mode, Box::new(job)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::backend::tests::RecordingBackend;
    use wallsmith_core::settings::download::DownloadSettings;

    fn builder() -> ApplyRequestBuilder {
        let downloader = Arc::new(Downloader::new(&DownloadSettings::default()).unwrap());
        ApplyRequestBuilder::new(downloader, Arc::new(RecordingBackend::default()))
    }

    #[test]
    fn test_empty_url_builds_nothing() {
        assert!(builder().build("", ApplyMode::Both).is_none());
        assert!(builder().build("   ", ApplyMode::Both).is_none());
    }

    #[test]
    fn test_invalid_url_builds_nothing() {
        assert!(builder().build("not a url", ApplyMode::Both).is_none());
    }

    #[test]
    fn test_valid_url_builds_request() {
        let request = builder()
            .build("https://walls.example/nature/lake.png", ApplyMode::External)
            .expect("no request");
        assert_eq!(request.mode, ApplyMode::External);
        assert_eq!(request.source_url.host_str(), Some("walls.example"));
    }
}
