use super::model::JournalEntry;
use crate::Result;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

// 8 MB per file before rotation
const ROTATE_THRESHOLD_BYTES: u64 = 8 * 1024 * 1024;
// Keep path.1 .. path.50
const MAX_BACKUPS: usize = 50;

/// JSON Lines result journal with size based rotation
pub struct JournalStorage {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
}

impl JournalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
            max_bytes: ROTATE_THRESHOLD_BYTES,
            max_backups: MAX_BACKUPS,
        }
    }

    /// Override rotation limits (mostly for tests)
    pub fn with_rotation(mut self, max_bytes: u64, max_backups: usize) -> Self {
        self.max_bytes = max_bytes;
        self.max_backups = max_backups;
        self
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Ensure directory exists
    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append one entry
    ///
    /// The size check, rotation and write all happen while holding an
    /// exclusive `fs2` lock on the `<path>.lock` sidecar, so overlapping
    /// runs (e.g. a slow cron job) neither interleave lines nor rotate twice.
    pub fn append(&self, entry: &JournalEntry) -> Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string(entry)?;

        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        self.rotate_if_needed()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;
        writeln!(file, "{}", json)?;
        drop(file);

        drop(lock);
        Ok(())
    }

    /// Read all entries of the current file (oldest first), skipping lines that fail to parse
    pub fn list(&self) -> Result<Vec<JournalEntry>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        // 写入方持有锁时等待，避免读到半行
        let lock = fs::File::open(self.lock_path()).ok();
        if let Some(lock) = &lock {
            lock.lock_shared()?;
        }

        let file = fs::File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(entry) = serde_json::from_str::<JournalEntry>(&line) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// Sidecar file that serializes writers across processes
    pub fn lock_path(&self) -> PathBuf {
        let mut name: OsString = self.file_path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Path of the n-th backup (`watchdog.log.1` is the newest)
    pub fn backup_path(&self, n: usize) -> PathBuf {
        let mut name: OsString = self.file_path.as_os_str().to_owned();
        name.push(format!(".{}", n));
        PathBuf::from(name)
    }

    /// Shift backups when the current file reached the size limit
    fn rotate_if_needed(&self) -> Result<()> {
        let Ok(metadata) = fs::metadata(&self.file_path) else {
            return Ok(());
        };
        if metadata.len() < self.max_bytes {
            return Ok(());
        }

        if self.max_backups == 0 {
            OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(&self.file_path)?;
            return Ok(());
        }

        let oldest = self.backup_path(self.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.max_backups).rev() {
            let src = self.backup_path(n);
            if src.exists() {
                fs::rename(&src, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.file_path, self.backup_path(1))?;

        Ok(())
    }
}
