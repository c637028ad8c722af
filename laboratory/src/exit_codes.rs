//! Stable exit codes for the `laboratory` CLI.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid input, config, or an I/O error.
pub const INVALID: i32 = 1;
