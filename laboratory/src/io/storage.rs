//! JSON file storage with optional timestamped backups.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::io::json::{self, JsonStyle};

const BACKUP_DIR: &str = "backups";
const BACKUP_DATE_FORMAT: &str = "%Y-%m-%d-%H-%M";

/// Stores one value of type `T` in `<data_folder>/<file_name><file_extension>`.
#[derive(Debug, Clone)]
pub struct StorageHandler<T> {
    file_name: String,
    file_extension: String,
    data_folder: PathBuf,
    style: JsonStyle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StorageHandler<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a handler, creating `data_folder` if needed.
    ///
    /// `file_extension` includes the leading dot (`.json`).
    pub fn new(
        file_name: impl Into<String>,
        file_extension: impl Into<String>,
        data_folder: impl Into<PathBuf>,
        style: JsonStyle,
    ) -> Self {
        let data_folder = data_folder.into();
        if let Err(err) = fs::create_dir_all(&data_folder) {
            warn!(path = %data_folder.display(), error = %err, "could not create data folder");
        }
        Self {
            file_name: file_name.into(),
            file_extension: file_extension.into(),
            data_folder,
            style,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.data_folder
            .join(format!("{}{}", self.file_name, self.file_extension))
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.data_folder.join(BACKUP_DIR)
    }

    /// Read the stored value; `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<T>> {
        let path = self.path();
        if !path.exists() {
            debug!(path = %path.display(), "no stored file");
            return Ok(None);
        }
        let contents =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let value = json::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
        Ok(Some(value))
    }

    /// Replace the stored value atomically.
    pub fn save(&self, data: &T) -> Result<()> {
        let path = self.path();
        debug!(path = %path.display(), "saving");
        let contents = json::to_string(data, self.style)
            .with_context(|| format!("serialize {}", path.display()))?;
        write_atomic(&path, &contents)
    }

    /// Move any existing file to `backups/` (stamped with the local time), then save.
    pub fn save_and_backup(&self, data: &T) -> Result<()> {
        self.save_and_backup_at(data, Local::now().naive_local())
    }

    /// [`save_and_backup`](Self::save_and_backup) with an explicit timestamp.
    ///
    /// A failed move is logged and the save still happens.
    pub fn save_and_backup_at(&self, data: &T, now: NaiveDateTime) -> Result<()> {
        let path = self.path();
        if path.exists() {
            let backup = self.backup_path(now);
            let moved = backup
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|()| fs::rename(&path, &backup));
            match moved {
                Ok(()) => debug!(from = %path.display(), to = %backup.display(), "backed up"),
                Err(err) => {
                    warn!(path = %backup.display(), error = %err, "could not move backup");
                }
            }
        }
        self.save(data)
    }

    /// `backups/<name>-<yyyy-MM-dd-HH-mm><ext>` for `now`.
    pub fn backup_path(&self, now: NaiveDateTime) -> PathBuf {
        self.backup_dir().join(format!(
            "{}-{}{}",
            self.file_name,
            now.format(BACKUP_DATE_FORMAT),
            self.file_extension
        ))
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("storage path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
