pub mod apply;
pub mod download;
pub mod scheduler_interval;
