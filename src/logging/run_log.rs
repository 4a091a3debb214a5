//! Per-run log file
//!
//! Each run writes a plain-text copy of its log into the run's temporary
//! directory so it can be attached to the summary email. The file is
//! attached after logging is initialized and must be detached before the
//! temporary directory is removed; [`RunLogGuard`] does that on drop.

use crate::domain::{Result, SyncError};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

type Slot = Arc<Mutex<Option<File>>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<File>> {
    match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// A log sink that can be pointed at a file and detached again
///
/// Events are dropped while nothing is attached.
#[derive(Clone, Default)]
pub struct RunLogFile {
    slot: Slot,
}

impl RunLogFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start writing to a new file at `path`
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn attach(&self, path: &Path) -> Result<RunLogGuard> {
        let file = File::create(path).map_err(|e| {
            SyncError::Io(format!("Failed to create log file {}: {e}", path.display()))
        })?;
        *lock(&self.slot) = Some(file);

        Ok(RunLogGuard {
            log: self.clone(),
            path: path.to_path_buf(),
        })
    }

    /// Flush and close the current file, if any
    pub fn detach(&self) {
        if let Some(mut file) = lock(&self.slot).take() {
            let _ = file.flush();
        }
    }

    pub fn is_attached(&self) -> bool {
        lock(&self.slot).is_some()
    }
}

/// Keeps the run log attached; detaches it on drop
pub struct RunLogGuard {
    log: RunLogFile,
    path: PathBuf,
}

impl RunLogGuard {
    /// Path of the attached file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLogGuard {
    fn drop(&mut self) {
        self.log.detach();
    }
}

/// Writer handed out per event
pub struct RunLogWriter {
    slot: Slot,
}

impl Write for RunLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match lock(&self.slot).as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match lock(&self.slot).as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RunLogFile {
    type Writer = RunLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RunLogWriter {
            slot: Arc::clone(&self.slot),
        }
    }
}
