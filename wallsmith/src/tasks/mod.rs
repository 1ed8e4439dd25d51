pub mod manager;
pub mod scheduler;

pub use manager::TaskManager;
pub use scheduler::{Job, WorkRequest, WorkScheduler};
