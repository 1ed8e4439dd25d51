pub mod applier;
pub mod backend;
pub mod downloader;
