//! JSON file helpers with atomic writes
//!
//! A file is either fully replaced or left as it was; a crash mid-write
//! leaves at most a stray `.json.tmp` next to it. [`JsonBatch`] extends
//! this to several files that must change together.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::error::{LedgerError, LedgerResult};

/// Read JSON from a file, returning the default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> LedgerResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| LedgerError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| LedgerError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> LedgerResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let mut batch = JsonBatch::new();
    batch.stage(path, data)?;
    batch.commit()
}

/// Temp file next to `path`, on the same filesystem so a rename is atomic
fn temp_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("json.bak")
}

fn write_temp<T: Serialize>(path: &Path, data: &T) -> LedgerResult<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp = temp_path(path);
    let file = File::create(&temp)
        .map_err(|e| LedgerError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    let written = serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| LedgerError::Storage(format!("Failed to serialize data: {}", e)))
        .and_then(|_| {
            writer
                .flush()
                .map_err(|e| LedgerError::Storage(format!("Failed to flush data: {}", e)))
        })
        .and_then(|_| {
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| LedgerError::Storage(format!("Failed to sync data: {}", e)))
        });

    if let Err(e) = written {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }
    Ok(temp)
}

struct Staged {
    target: PathBuf,
    temp: PathBuf,
}

/// Several JSON files replaced together: either every file changes or none does
///
/// [`JsonBatch::stage`] writes each file's new content to a temp file and
/// touches nothing else. [`JsonBatch::commit`] then renames the temp files
/// over their targets, keeping a backup of each replaced file until all
/// renames went through, and puts the backups back if one fails. Temp files
/// of a batch dropped without committing are removed.
#[derive(Default)]
pub struct JsonBatch {
    staged: Vec<Staged>,
}

impl JsonBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Write `data` to the temp file of `path`
    pub fn stage<T, P>(&mut self, path: P, data: &T) -> LedgerResult<()>
    where
        T: Serialize,
        P: AsRef<Path>,
    {
        let target = path.as_ref().to_path_buf();
        let temp = write_temp(&target, data)?;
        self.staged.push(Staged { target, temp });
        Ok(())
    }

    /// Move every staged file into place
    pub fn commit(mut self) -> LedgerResult<()> {
        let staged = std::mem::take(&mut self.staged);
        let mut replaced: Vec<(PathBuf, Option<PathBuf>)> = Vec::with_capacity(staged.len());

        for (position, file) in staged.iter().enumerate() {
            match Self::replace(file) {
                Ok(backup) => replaced.push((file.target.clone(), backup)),
                Err(e) => {
                    for pending in &staged[position..] {
                        let _ = fs::remove_file(&pending.temp);
                    }
                    Self::restore(&replaced);
                    return Err(e);
                }
            }
        }

        for backup in replaced.iter().filter_map(|(_, backup)| backup.as_ref()) {
            let _ = fs::remove_file(backup);
        }
        Ok(())
    }

    /// Back the target up, then rename the temp file over it
    fn replace(file: &Staged) -> LedgerResult<Option<PathBuf>> {
        let backup = if file.target.is_file() {
            let backup = backup_path(&file.target);
            fs::copy(&file.target, &backup).map_err(|e| {
                LedgerError::Storage(format!(
                    "Failed to back up {}: {}",
                    file.target.display(),
                    e
                ))
            })?;
            Some(backup)
        } else {
            None
        };

        if let Err(e) = fs::rename(&file.temp, &file.target) {
            if let Some(backup) = &backup {
                let _ = fs::remove_file(backup);
            }
            return Err(LedgerError::Storage(format!("Failed to rename temp file: {}", e)));
        }
        Ok(backup)
    }

    /// Undo the renames already done, newest first
    fn restore(replaced: &[(PathBuf, Option<PathBuf>)]) {
        for (target, backup) in replaced.iter().rev() {
            let restored = match backup {
                Some(backup) => fs::rename(backup, target),
                None => fs::remove_file(target),
            };
            if let Err(e) = restored {
                warn!(
                    path = %target.display(),
                    error = %e,
                    "failed to restore file after an aborted write"
                );
            }
        }
    }
}

impl Drop for JsonBatch {
    fn drop(&mut self) {
        for file in &self.staged {
            let _ = fs::remove_file(&file.temp);
        }
    }
}
