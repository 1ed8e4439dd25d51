pub mod config;

pub use config::Settings;
