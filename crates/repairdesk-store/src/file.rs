//! JSON-file implementation of the SlotBackend trait.
//!
//! Each slot is one `<key>.json` file inside a data directory. Writes go to a
//! temporary sibling first and are renamed over the target after an fsync,
//! so readers never observe a half-written slot.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::traits::SlotBackend;

const SLOT_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// Directory of JSON slot files.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (and create if needed) a data directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that holds `key`.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.dir.join(format!("{key}.{SLOT_EXTENSION}")))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{TEMP_EXTENSION}"))
    }
}

/// Slot keys become file names, so only a conservative character set is
/// accepted.
fn check_key(key: &str) -> Result<()> {
    let ok = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

impl SlotBackend for FileBackend {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(payload) => {
                debug!(path = %path.display(), bytes = payload.len(), "read slot");
                Ok(Some(payload))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_slot(&self, key: &str, payload: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        let temp = self.temp_path(key);

        let mut file = File::create(&temp)?;
        file.write_all(payload.as_bytes())?;
        file.flush()?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &path)?;
        debug!(path = %path.display(), bytes = payload.len(), "wrote slot");
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
