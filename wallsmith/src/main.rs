use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

use wallsmith::app_state::AppState;
use wallsmith::apply::chooser::CommandChooser;
use wallsmith::apply::request::ApplyRequestBuilder;
use wallsmith::apply::{ApplyEvents, ApplySession, HandoffFlow};
use wallsmith::init_telemetry::init_telemetry_and_tracing;
use wallsmith::tasks::WorkScheduler;
use wallsmith::workers::backend::CommandBackend;
use wallsmith::workers::downloader::Downloader;
use wallsmith_core::apply::ApplyMode;

#[derive(Parser)]
#[command(name = "wallsmith")]
#[command(about = "Applies wallpapers from remote collections in the background")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Download a wallpaper and apply it
    Apply {
        /// Wallpaper source url
        url: String,
        /// Where to apply it: home, lock, both or external
        #[arg(long, default_value = "both")]
        mode: ApplyModeArg,
    },
}

#[derive(Clone)]
struct ApplyModeArg(ApplyMode);

impl std::str::FromStr for ApplyModeArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ApplyModeArg)
    }
}

#[derive(Debug, Clone, Copy)]
enum ApplyOutcome {
    Applied,
    Failed,
}

struct CliEvents {
    outcomes: mpsc::Sender<ApplyOutcome>,
}

#[async_trait]
impl ApplyEvents for CliEvents {
    async fn on_enqueued(&self, mode: ApplyMode) {
        info!("Apply task enqueued ({})", mode);
    }

    async fn on_applied(&self) {
        let _ = self.outcomes.send(ApplyOutcome::Applied).await;
    }

    async fn on_failure(&self) {
        let _ = self.outcomes.send(ApplyOutcome::Failed).await;
    }

    async fn on_ready_for_external_handoff(&self, path: &str) {
        info!("Handing {} to the system opener", path);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config => {
            let app_state = AppState::new_for_config_only()?;
            println!("{:#?}", &app_state.settings);
            Ok(())
        }
        Commands::Apply { url, mode } => apply(&url, mode.0).await,
    }
}

async fn apply(url: &str, mode: ApplyMode) -> anyhow::Result<()> {
    let app_state = AppState::new(None)?;
    init_telemetry_and_tracing(app_state.settings.debug)?;

    let downloader = Arc::new(Downloader::new(&app_state.settings.download)?);
    let backend = Arc::new(CommandBackend::new(&app_state.settings.apply));
    let builder = Arc::new(ApplyRequestBuilder::new(downloader, backend));

    let (chooser_tx, mut chooser_rx) = mpsc::channel(4);
    let chooser = CommandChooser::new(
        app_state.settings.apply.opener_command.clone(),
        chooser_tx,
    );

    let (outcome_tx, mut outcome_rx) = mpsc::channel(1);
    let session = ApplySession::new(
        Arc::new(app_state.task_manager.clone()) as Arc<dyn WorkScheduler>,
        builder,
        Arc::new(CliEvents {
            outcomes: outcome_tx,
        }),
        app_state.notifier.clone(),
        HandoffFlow::new(Box::new(chooser)),
    );

    // Keep the task registry tidy while we wait.
    {
        let task_manager = app_state.task_manager.clone();
        let interval: std::time::Duration = app_state.settings.scheduler.task_cleanup.into();
        let ttl: chrono::Duration = app_state.settings.scheduler.task_ttl.into();
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            loop {
                timer.tick().await;
                task_manager.run_cleanup(ttl).await;
            }
        });
    }

    if !session.submit_and_observe(url, mode).await {
        anyhow::bail!("Nothing to apply for '{url}'");
    }

    loop {
        tokio::select! {
            Some((code, outcome)) = chooser_rx.recv() => {
                session.on_handoff_result(code, outcome).await;
            }
            Some(outcome) = outcome_rx.recv() => {
                match outcome {
                    ApplyOutcome::Applied => {
                        info!("Done");
                        return Ok(());
                    }
                    ApplyOutcome::Failed => {
                        anyhow::bail!("Applying the wallpaper failed");
                    }
                }
            }
            else => {
                anyhow::bail!("Apply flow ended without an outcome");
            }
        }
    }
}
