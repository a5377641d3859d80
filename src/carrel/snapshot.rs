//! The engine's persistence-facing contract: one value holding deep
//! copies of everything, serializable as-is. The store layer decides
//! where it lives; the engine only produces and consumes it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use uuid::Uuid;

use crate::memento::Memento;
use crate::model::{Item, Task};

/// Full engine state at a point in time. Restoring one is
/// clear-and-rebuild, never incremental.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    /// Sorted by title for stable output.
    pub items: Vec<Item>,
    pub keyword_index: HashMap<String, HashSet<Uuid>>,
    pub item_keywords: HashMap<Uuid, BTreeSet<String>>,
    pub item_tags: HashMap<Uuid, BTreeSet<String>>,
    pub tag_frequency: HashMap<String, u32>,
    pub unique_paths: HashSet<String>,
    /// Most-recent-first.
    pub recently_viewed: Vec<Uuid>,
    /// Oldest-first; the last entry is the next to be undone.
    pub undo_history: Vec<Memento>,
    pub tasks: Vec<Task>,
}
