pub mod channel;
pub mod log;
pub mod notify;

pub use notify::Notifier;
