pub mod chooser;
pub mod handoff;
pub mod request;
pub mod resolver;
pub mod session;

use std::path::PathBuf;

/// Failure causes inside the apply flow. All of them surface to the caller
/// as the single generic failure callback; the cause only shows up in logs.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("background task failed")]
    TaskFailed,

    #[error("could not resolve '{}' to a shareable resource", path.display())]
    ResourceUnresolvable { path: PathBuf },

    #[error("failed to launch the external chooser: {0}")]
    HandoffLaunchFailed(#[source] anyhow::Error),
}

pub use handoff::{ChooserLauncher, ChooserOutcome, HandoffFlow};
pub use request::RequestBuilder;
pub use session::{ApplyEvents, ApplySession};
