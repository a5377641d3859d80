use super::SnapshotStore;
use crate::error::{CarrelError, Result};
use crate::snapshot::LibrarySnapshot;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

const LIBRARY_FILENAME: &str = "library.json";
const BACKUP_PREFIX: &str = "backup_";

pub struct FileStore {
    root: PathBuf,
    backup_keep: usize,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            backup_keep: 5,
        }
    }

    pub fn with_backup_keep(mut self, keep: usize) -> Self {
        self.backup_keep = keep;
        self
    }

    pub fn library_path(&self) -> PathBuf {
        self.root.join(LIBRARY_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(CarrelError::Io)?;
        }
        Ok(())
    }

    fn backup_files(&self) -> Result<Vec<PathBuf>> {
        let mut backups = Vec::new();
        if !self.root.exists() {
            return Ok(backups);
        }
        for entry in fs::read_dir(&self.root).map_err(CarrelError::Io)? {
            let entry = entry.map_err(CarrelError::Io)?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(BACKUP_PREFIX) && name.ends_with(".json") {
                backups.push(entry.path());
            }
        }
        // Timestamped names sort chronologically.
        backups.sort();
        Ok(backups)
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.backup_files()?;
        if backups.len() <= self.backup_keep {
            return Ok(());
        }
        let excess = backups.len() - self.backup_keep;
        for stale in &backups[..excess] {
            fs::remove_file(stale).map_err(CarrelError::Io)?;
        }
        Ok(())
    }
}

impl SnapshotStore for FileStore {
    fn save(&mut self, snapshot: &LibrarySnapshot) -> Result<()> {
        self.ensure_dir()?;
        let content =
            serde_json::to_string_pretty(snapshot).map_err(CarrelError::Serialization)?;
        fs::write(self.library_path(), content).map_err(CarrelError::Io)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<LibrarySnapshot>> {
        let path = self.library_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(CarrelError::Io)?;
        let snapshot = serde_json::from_str(&content).map_err(CarrelError::Serialization)?;
        Ok(Some(snapshot))
    }

    /// Copy the current library file to `backup_YYYYMMDD_HHMMSS.json`,
    /// then drop the oldest backups past the keep count.
    fn backup(&mut self) -> Result<()> {
        let source = self.library_path();
        if !source.exists() {
            return Ok(());
        }
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let target = self
            .root
            .join(format!("{}{}.json", BACKUP_PREFIX, stamp));
        copy_if_absent(&source, &target)?;
        self.prune_backups()
    }
}

// Two backups within the same second keep the first copy.
fn copy_if_absent(source: &Path, target: &Path) -> Result<()> {
    if target.exists() {
        return Ok(());
    }
    fs::copy(source, target).map_err(CarrelError::Io)?;
    Ok(())
}
