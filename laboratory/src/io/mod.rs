//! Side-effecting helpers: configuration, JSON and file storage.

pub mod config;
pub mod json;
pub mod storage;
