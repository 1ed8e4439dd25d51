use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use wallsmith_core::apply::ApplyMode;
use wallsmith_core::settings::apply::ApplySettings;

/// Applies a downloaded file as the wallpaper for a mode.
#[async_trait]
pub trait WallpaperBackend: Send + Sync {
    async fn set_wallpaper(&self, path: &Path, mode: ApplyMode) -> anyhow::Result<()>;
}

/// Splits a command template into program and arguments, substituting the
/// given placeholders in every token.
pub(crate) fn build_command(
    template: &str,
    replacements: &[(&str, &str)],
) -> anyhow::Result<(String, Vec<String>)> {
    let tokens: Vec<String> = template
        .split_whitespace()
        .map(|token| {
            let mut token = token.to_string();
            for (placeholder, value) in replacements {
                token = token.replace(placeholder, value);
            }
            token
        })
        .collect();

    match tokens.split_first() {
        Some((program, args)) => Ok((program.clone(), args.to_vec())),
        None => anyhow::bail!("Empty command template"),
    }
}

/// Runs the configured command template for the requested mode.
pub struct CommandBackend {
    settings: ApplySettings,
}

impl CommandBackend {
    pub fn new(settings: &ApplySettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }
}

#[async_trait]
impl WallpaperBackend for CommandBackend {
    async fn set_wallpaper(&self, path: &Path, mode: ApplyMode) -> anyhow::Result<()> {
        let template = self
            .settings
            .command_for(&mode)
            .ok_or(anyhow::anyhow!("No apply command configured for {mode}"))?;
        let (program, args) =
            build_command(template, &[("{path}", &path.to_string_lossy())])?;

        debug!("Running apply command: {} {:?}", program, args);
        let status = Command::new(&program).args(&args).status().await?;
        if !status.success() {
            anyhow::bail!("Apply command '{program}' exited with {status}");
        }
        info!("Applied {} ({})", path.display(), mode);
        Ok(())
    }
}
