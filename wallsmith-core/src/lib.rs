pub mod apply;
pub mod notification_types;
pub mod settings;
pub mod tasks;
pub mod utils;
