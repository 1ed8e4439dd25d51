use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::apply::ApplyMode;

/// Configuration for applying wallpapers.
///
/// `commands` maps an apply mode to a shell-less command template; `{path}`
/// is replaced with the downloaded file. The `External` mode needs no entry,
/// it uses `opener_command` for the chooser flow instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplySettings {
    #[serde(default)]
    pub commands: HashMap<ApplyMode, String>,
    /// Command template used to hand a finished file to an external
    /// application, `{url}` replaced with the resource locator.
    pub opener_command: String,
}

impl Default for ApplySettings {
    fn default() -> Self {
        let mut commands = HashMap::new();
        commands.insert(
            ApplyMode::Both,
            "feh --bg-fill {path}".to_string(),
        );
        Self {
            commands,
            opener_command: "xdg-open {url}".to_string(),
        }
    }
}

impl ApplySettings {
    /// Command template for a mode, falling back to the `Both` entry.
    pub fn command_for(&self, mode: &ApplyMode) -> Option<&str> {
        self.commands
            .get(mode)
            .or_else(|| self.commands.get(&ApplyMode::Both))
            .map(|s| s.as_str())
    }
}
