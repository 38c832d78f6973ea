//! Memoized dataset loading keyed on the source file's modification time

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{error, info};

use crate::{DataError, Dataset};

/// Holds the loaded table and reloads it only when the file changes on disk.
///
/// The table itself stays immutable; a change on disk swaps in a freshly
/// loaded table and bumps the generation counter that views key their own
/// caches on.
pub struct DatasetCache {
    path: PathBuf,
    modified: Option<SystemTime>,
    dataset: Dataset,
    generation: u64,
}

impl DatasetCache {
    /// Load the table for the first time. Errors here are fatal to startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DataError> {
        let path = path.into();
        let dataset = Dataset::load(&path)?;
        let modified = file_mtime(&path);
        Ok(Self {
            path,
            modified,
            dataset,
            generation: 0,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Monotonic counter, bumped on every successful reload
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload the table if the file's modification time changed.
    ///
    /// Returns `Ok(true)` when a new table was swapped in and `Ok(false)`
    /// when the file is unchanged. A failed reload keeps the previous table
    /// and surfaces the error to the caller.
    pub fn refresh(&mut self) -> Result<bool, DataError> {
        let modified = file_mtime(&self.path);
        if modified == self.modified {
            return Ok(false);
        }

        // Record the new mtime either way so a broken file is not re-parsed
        // on every frame.
        self.modified = modified;

        match Dataset::load(&self.path) {
            Ok(dataset) => {
                info!("Source file {} changed, table reloaded", self.path.display());
                self.dataset = dataset;
                self.generation += 1;
                Ok(true)
            }
            Err(e) => {
                error!(
                    "Reload of {} failed, keeping previous table: {}",
                    self.path.display(),
                    e
                );
                Err(e)
            }
        }
    }
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
