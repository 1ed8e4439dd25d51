use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use wallsmith_core::notification_types::NotificationReceiver;
use wallsmith_core::settings::{
    apply::ApplySettings, download::DownloadSettings, scheduler_interval::SchedulerInterval,
};

#[derive(Debug, Deserialize, Clone)]
#[readonly::make]
pub struct Scheduler {
    pub task_cleanup: SchedulerInterval,
    pub task_ttl: SchedulerInterval,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    pub receivers: Vec<NotificationReceiver>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            receivers: vec![NotificationReceiver::Log],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub debug: bool,
    pub download: DownloadSettings,
    pub apply: ApplySettings,
    pub scheduler: Scheduler,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            debug: false,
            download: DownloadSettings::default(),
            apply: ApplySettings::default(),
            scheduler: Scheduler {
                task_cleanup: SchedulerInterval::Minutes(1),
                task_ttl: SchedulerInterval::Hours(1),
            },
            notifications: NotificationSettings::default(),
        }
    }
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("WALLSMITH")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("WALLSMITH_RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("debug", false)?
            .set_default("download.cache_dir", "/tmp/wallsmith")?
            .set_default("download.timeout_secs", 30)?
            .set_default("download.reuse_cached", true)?
            .set_default("apply.commands.both", "feh --bg-fill {path}")?
            .set_default("apply.opener_command", "xdg-open {url}")?
            .set_default("scheduler.task_cleanup", "1m")?
            .set_default("scheduler.task_ttl", "1h")?
            // Start off by merging in the "default" configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment());

        let s = builder.build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallsmith_core::apply::ApplyMode;

    #[test]
    fn test_defaults_deserialize() {
        let settings = Settings::new().expect("Failed to load settings");
        assert!(!settings.debug);
        assert_eq!(settings.download.timeout_secs, 30);
        assert_eq!(
            settings.apply.command_for(&ApplyMode::Home),
            Some("feh --bg-fill {path}")
        );
        assert_eq!(
            settings.notifications.receivers,
            vec![NotificationReceiver::Log]
        );
    }

    #[test]
    fn test_env_overrides_cache_dir() {
        env::set_var("WALLSMITH__DOWNLOAD__CACHE_DIR", "/var/cache/walls");

        let settings = Settings::new().expect("Failed to load settings");
        assert_eq!(settings.download.cache_dir, "/var/cache/walls");

        env::remove_var("WALLSMITH__DOWNLOAD__CACHE_DIR");
    }
}
