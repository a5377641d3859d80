//! # Persistence boundary
//!
//! The engine hands out a [`LibrarySnapshot`] and takes one back; this
//! module decides where snapshots live. The [`SnapshotStore`] trait keeps
//! that decision swappable:
//!
//! - [`fs::FileStore`]: production storage, `library.json` in a data
//!   directory, with rotated timestamped backups
//! - [`memory::InMemoryStore`]: held in memory, for tests
//!
//! Everything about encoding lives in the snapshot's serde derives; the
//! store only places bytes.

use crate::error::Result;
use crate::snapshot::LibrarySnapshot;

pub mod fs;
pub mod memory;

/// Abstract interface for snapshot persistence.
pub trait SnapshotStore {
    /// Persist a snapshot, replacing whatever was stored before.
    fn save(&mut self, snapshot: &LibrarySnapshot) -> Result<()>;

    /// Load the stored snapshot, or `None` when nothing has been saved
    /// yet.
    fn load(&self) -> Result<Option<LibrarySnapshot>>;

    /// Preserve a copy of the current stored state before the next save.
    /// Stores without a backing medium may treat this as a no-op.
    fn backup(&mut self) -> Result<()> {
        Ok(())
    }
}
