//! Test-only fixtures shared by unit and integration tests.

use std::path::{Path, PathBuf};

use crate::geometry::{CircularRegion, Position};
use crate::io::config::{CONFIG_FILE, LaboratoryConfig, write_config};
use crate::locale::TranslationRegistry;
use crate::locale::manager::bundled_registry;

/// World name used by geometry fixtures.
pub const WORLD: &str = "overworld";

/// A registry holding only the bundled English translations.
pub fn bundled_translator() -> TranslationRegistry {
    bundled_registry()
}

pub fn position(x: f64, y: f64, z: f64) -> Position {
    Position::new(x, y, z, WORLD)
}

/// A circle of radius 5 centred on block (0, 64, 0).
pub fn sample_circle() -> CircularRegion {
    CircularRegion::new(position(0.5, 64.0, 0.5), 5.0).expect("sample circle")
}

/// Write a config under `root` whose data directory is `root/data`.
///
/// Returns the config file path.
pub fn write_temp_config(root: &Path, backups: bool) -> PathBuf {
    let path = root.join(CONFIG_FILE);
    let cfg = LaboratoryConfig {
        data_dir: root.join("data"),
        backups,
        ..LaboratoryConfig::default()
    };
    write_config(&path, &cfg).expect("write test config");
    path
}
