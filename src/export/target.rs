//! Destinations for exported files.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ExportFile;
use crate::error::Result;

/// Somewhere an exported file can be saved.
pub trait SaveTarget {
    fn save(&mut self, file: ExportFile) -> Result<()>;
}

/// Writes files into a directory.
///
/// Bytes go to a hidden `.part` file first, which is renamed into place on
/// success and deleted on failure, so a failed save never leaves a
/// truncated file behind.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for DirectoryTarget {
    fn save(&mut self, file: ExportFile) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let destination = self.dir.join(&file.name);
        let part = PartFile::create(self.dir.join(format!(".{}.part", file.name)))?;
        part.write_and_persist(&file.bytes, &destination)?;
        debug!(path = %destination.display(), bytes = file.bytes.len(), "saved export");
        Ok(())
    }
}

/// Temporary file removed on drop unless it was persisted.
struct PartFile {
    path: PathBuf,
    file: Option<File>,
    persisted: bool,
}

impl PartFile {
    fn create(path: PathBuf) -> Result<Self> {
        let file = File::create(&path)?;
        Ok(Self {
            path,
            file: Some(file),
            persisted: false,
        })
    }

    fn write_and_persist(mut self, bytes: &[u8], destination: &Path) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&self.path, destination)?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if !self.persisted {
            self.file.take();
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Keeps saved files in memory, in save order.
#[derive(Debug, Clone, Default)]
pub struct MemoryTarget {
    pub files: Vec<ExportFile>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveTarget for MemoryTarget {
    fn save(&mut self, file: ExportFile) -> Result<()> {
        self.files.push(file);
        Ok(())
    }
}
