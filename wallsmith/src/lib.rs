//! Wallsmith engine
//!
//! This library exposes the task manager, the apply session and the
//! supporting pieces so the flows can be driven from the binary and from
//! integration tests.

pub mod app_state;
pub mod apply;
pub mod init_telemetry;
pub mod notification;
pub mod settings;
pub mod tasks;
pub mod workers;

pub use app_state::AppState;
