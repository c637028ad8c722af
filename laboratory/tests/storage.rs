//! Storing world-space values through `StorageHandler`.

use std::fs;

use chrono::NaiveDate;
use laboratory::geometry::{BlockRegion, CircularRegion, Direction, Point};
use laboratory::io::json::JsonStyle;
use laboratory::io::storage::StorageHandler;
use laboratory::test_support::{WORLD, position, sample_circle};

#[test]
fn circular_region_survives_storage() {
    let temp = tempfile::tempdir().expect("tempdir");
    let storage: StorageHandler<CircularRegion> =
        StorageHandler::new("circle", ".json", temp.path().join("region"), JsonStyle::Pretty);

    assert_eq!(storage.load().expect("load empty"), None);
    storage.save(&sample_circle()).expect("save");

    let raw = fs::read_to_string(storage.path()).expect("read");
    assert!(raw.ends_with("}\n"));
    assert!(raw.contains("\"radius\": 5.0"));
    assert_eq!(storage.load().expect("load"), Some(sample_circle()));
}

#[test]
fn invalid_stored_region_is_an_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let storage: StorageHandler<BlockRegion> =
        StorageHandler::new("blocks", ".json", temp.path(), JsonStyle::Compact);
    fs::write(
        storage.path(),
        r#"{"min":{"x":0,"y":0,"z":0,"world":"a"},"max":{"x":1,"y":1,"z":1,"world":"b"}}"#,
    )
    .expect("write");

    let err = storage.load().unwrap_err();
    assert!(format!("{err:#}").contains("different worlds"));
}

#[test]
fn points_are_backed_up_per_minute() {
    let temp = tempfile::tempdir().expect("tempdir");
    let storage: StorageHandler<Vec<Point>> =
        StorageHandler::new("spawns", ".json", temp.path(), JsonStyle::Compact);
    let first = vec![position(0.0, 64.0, 0.0).with_direction(Direction::ZERO)];
    let second = vec![position(10.0, 70.0, -4.0).with_direction(Direction::new(180.0, 10.0))];
    let at = NaiveDate::from_ymd_opt(2023, 12, 31)
        .and_then(|date| date.and_hms_opt(23, 59, 1))
        .expect("valid date");

    storage.save_and_backup_at(&first, at).expect("first save");
    storage.save_and_backup_at(&second, at).expect("second save");

    let backup = temp.path().join("backups").join("spawns-2023-12-31-23-59.json");
    let backed_up = fs::read_to_string(&backup).expect("backup file");
    assert_eq!(
        backed_up,
        format!(r#"[{{"x":0.0,"y":64.0,"z":0.0,"world":"{WORLD}","yaw":0.0,"pitch":0.0}}]"#)
    );
    assert_eq!(storage.load().expect("load"), Some(second));
}
