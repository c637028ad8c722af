//! Laboratory: a grab-bag of game-server utilities.
//!
//! - **[`core`]**: pure, deterministic logic. An arithmetic expression
//!   evaluator, human duration parsing and formatting, damage modifiers,
//!   cooldowns, table-driven trigonometry and schedule-date arithmetic.
//! - **[`geometry`]**: immutable world-space value types with stable JSON shapes.
//! - **[`locale`]**: translation registries with locale fallback and a
//!   process-wide translator.
//! - **[`io`]**: side-effecting helpers (TOML config, JSON file storage with backups).
//! - **[`scheduler`]**: background jobs on tokio, including weekly tasks.
//!
//! The `laboratory` binary exposes a few of these from the command line.

pub mod core;
pub mod exit_codes;
pub mod geometry;
pub mod io;
pub mod locale;
pub mod logging;
pub mod scheduler;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
