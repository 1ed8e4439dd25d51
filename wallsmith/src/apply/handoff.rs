use std::path::Path;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use super::resolver::{default_resolvers, UriResolver};
use super::ApplyError;

const FALLBACK_MIME: &str = "image/*";

/// What the external chooser reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChooserOutcome {
    /// An application was picked and the chooser returned normally. Treated
    /// as applied no matter what the picked application did with the file.
    Handled,
    /// The chooser was dismissed without picking anything.
    Dismissed,
}

/// Launches the external selection flow. The outcome arrives later through
/// [`ApplySession::on_handoff_result`](super::ApplySession::on_handoff_result),
/// tagged with the correlation code the launch was given.
#[async_trait]
pub trait ChooserLauncher: Send + Sync {
    async fn launch(&self, url: &Url, mime: &str, correlation_code: Uuid) -> anyhow::Result<()>;
}

/// Hands a finished wallpaper file to an external application.
///
/// One flow holds at most one pending correlation code; launching replaces
/// it and a result can claim it exactly once.
pub struct HandoffFlow {
    resolvers: Vec<Box<dyn UriResolver>>,
    launcher: Box<dyn ChooserLauncher>,
    pending: Mutex<Option<Uuid>>,
}

impl HandoffFlow {
    pub fn new(launcher: Box<dyn ChooserLauncher>) -> Self {
        Self::with_resolvers(default_resolvers(), launcher)
    }

    pub fn with_resolvers(
        resolvers: Vec<Box<dyn UriResolver>>,
        launcher: Box<dyn ChooserLauncher>,
    ) -> Self {
        Self {
            resolvers,
            launcher,
            pending: Mutex::new(None),
        }
    }

    /// Resolves `path` and launches the chooser with a fresh correlation
    /// code. Resolution tries each strategy in order; all of them failing
    /// means there is nothing to share and no launch is attempted.
    pub async fn begin(&self, path: &Path) -> Result<Uuid, ApplyError> {
        let url = self
            .resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(path))
            .ok_or_else(|| ApplyError::ResourceUnresolvable {
                path: path.to_path_buf(),
            })?;

        let mime = mime_guess::from_path(path)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_else(|| FALLBACK_MIME.to_string());

        let code = Uuid::new_v4();
        *self.pending.lock().await = Some(code);

        debug!("Launching external chooser for {} ({})", url, mime);
        match self.launcher.launch(&url, &mime, code).await {
            Ok(()) => Ok(code),
            Err(err) => {
                warn!("Chooser launch failed: {:?}", err);
                *self.pending.lock().await = None;
                Err(ApplyError::HandoffLaunchFailed(err))
            }
        }
    }

    /// Claims the pending correlation code. Returns false when `code` does
    /// not match, in which case the result belongs to some other flow and
    /// must be ignored.
    pub async fn claim(&self, code: Uuid) -> bool {
        let mut pending = self.pending.lock().await;
        if *pending == Some(code) {
            *pending = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;
    use tokio::sync::Mutex as AsyncMutex;

    #[derive(Default)]
    struct RecordingLauncher {
        launches: Arc<AsyncMutex<Vec<(String, String, Uuid)>>>,
        fail: bool,
    }

    #[async_trait]
    impl ChooserLauncher for RecordingLauncher {
        async fn launch(&self, url: &Url, mime: &str, code: Uuid) -> anyhow::Result<()> {
            self.launches
                .lock()
                .await
                .push((url.to_string(), mime.to_string(), code));
            if self.fail {
                anyhow::bail!("no handler registered");
            }
            Ok(())
        }
    }

    fn existing_png() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("wall.png");
        std::fs::File::create(&file)
            .unwrap()
            .write_all(b"png")
            .unwrap();
        (dir, file)
    }

    #[tokio::test]
    async fn test_begin_launches_with_file_url_and_mime() {
        let launches = Arc::new(AsyncMutex::new(vec![]));
        let flow = HandoffFlow::new(Box::new(RecordingLauncher {
            launches: launches.clone(),
            fail: false,
        }));

        let (_dir, file) = existing_png();
        let code = flow.begin(&file).await.expect("begin failed");

        let launches = launches.lock().await;
        assert_eq!(launches.len(), 1);
        let (url, mime, launched_code) = &launches[0];
        assert!(url.starts_with("file://"));
        assert_eq!(mime, "image/png");
        assert_eq!(*launched_code, code);
    }

    #[tokio::test]
    async fn test_unresolvable_path_attempts_no_launch() {
        let launches = Arc::new(AsyncMutex::new(vec![]));
        let flow = HandoffFlow::new(Box::new(RecordingLauncher {
            launches: launches.clone(),
            fail: false,
        }));

        let err = flow.begin(Path::new("relative.png")).await.unwrap_err();
        assert!(matches!(err, ApplyError::ResourceUnresolvable { .. }));
        assert!(launches.lock().await.is_empty());
        // Nothing pending either.
        assert!(!flow.claim(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn test_launch_failure_clears_pending_code() {
        let flow = HandoffFlow::new(Box::new(RecordingLauncher {
            launches: Arc::new(AsyncMutex::new(vec![])),
            fail: true,
        }));

        let (_dir, file) = existing_png();
        let err = flow.begin(&file).await.unwrap_err();
        assert!(matches!(err, ApplyError::HandoffLaunchFailed(_)));
        assert!(!flow.claim(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn test_claim_matches_exactly_once() {
        let flow = HandoffFlow::new(Box::new(RecordingLauncher::default()));
        let (_dir, file) = existing_png();
        let code = flow.begin(&file).await.unwrap();

        assert!(!flow.claim(Uuid::new_v4()).await);
        assert!(flow.claim(code).await);
        assert!(!flow.claim(code).await);
    }
}
