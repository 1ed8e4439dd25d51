use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::workers::backend::build_command;

use super::handoff::{ChooserLauncher, ChooserOutcome};

/// Chooser launcher backed by a system opener command (`xdg-open {url}` by
/// default). The opener's exit status is reported as the chooser outcome on
/// the results channel; the embedder feeds it back into
/// [`ApplySession::on_handoff_result`](super::ApplySession::on_handoff_result).
pub struct CommandChooser {
    command_template: String,
    results: mpsc::Sender<(Uuid, ChooserOutcome)>,
}

impl CommandChooser {
    pub fn new(
        command_template: impl Into<String>,
        results: mpsc::Sender<(Uuid, ChooserOutcome)>,
    ) -> Self {
        Self {
            command_template: command_template.into(),
            results,
        }
    }
}

#[async_trait]
impl ChooserLauncher for CommandChooser {
    async fn launch(&self, url: &Url, mime: &str, correlation_code: Uuid) -> anyhow::Result<()> {
        let (program, args) = build_command(
            &self.command_template,
            &[("{url}", url.as_str()), ("{mime}", mime)],
        )?;

        debug!("Launching opener: {} {:?}", program, args);
        let mut child = tokio::process::Command::new(&program).args(&args).spawn()?;

        let results = self.results.clone();
        tokio::spawn(async move {
            let outcome = match child.wait().await {
                Ok(status) if status.success() => ChooserOutcome::Handled,
                Ok(status) => {
                    warn!("Opener exited with {}", status);
                    ChooserOutcome::Dismissed
                }
                Err(err) => {
                    warn!("Failed to wait for opener: {:?}", err);
                    ChooserOutcome::Dismissed
                }
            };
            let _ = results.send((correlation_code, outcome)).await;
        });

        Ok(())
    }
}
