//! The library engine: the one type every other layer talks to.
//!
//! Composes the keyword index, the task board, the view-history stack and
//! the undo history behind a single facade. Every mutating operation is a
//! synchronous in-memory step that leaves the index, the unique-path set
//! and the undo history consistent with the item map, including the
//! failure paths, which roll back symmetrically (see [`Library::edit_item`]).
//!
//! The engine does no I/O and no locking; callers serialize access.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

use crate::error::{CarrelError, Result};
use crate::index::{IndexParts, KeywordIndex};
use crate::memento::{Memento, UndoOp};
use crate::model::{Item, Task};
use crate::recent::{RecentlyViewed, DEFAULT_LIMIT};
use crate::search;
use crate::snapshot::LibrarySnapshot;
use crate::tasks::TaskBoard;

#[derive(Debug, Default)]
pub struct Library {
    items: HashMap<Uuid, Item>,
    index: KeywordIndex,
    unique_paths: HashSet<String>,
    undo_history: Vec<Memento>,
    tasks: TaskBoard,
    recent: RecentlyViewed,
}

impl Library {
    pub fn new() -> Self {
        Self::with_recent_limit(DEFAULT_LIMIT)
    }

    pub fn with_recent_limit(limit: usize) -> Self {
        Self {
            recent: RecentlyViewed::new(limit),
            ..Self::default()
        }
    }

    // --- Items ---

    /// Add an item, reserving its normalized file path. Fails without any
    /// partial insertion when another item already holds the path.
    pub fn add_item(&mut self, item: Item) -> Result<Uuid> {
        self.add_item_internal(item, true)
    }

    fn add_item_internal(&mut self, item: Item, record_undo: bool) -> Result<Uuid> {
        let normalized = normalized_path(item.file_path());
        if let Some(path) = &normalized {
            if self.unique_paths.contains(path) {
                return Err(CarrelError::DuplicatePath(path.clone()));
            }
        }

        let id = item.id();
        if let Some(path) = normalized {
            self.unique_paths.insert(path);
        }
        self.index.insert(&item);
        self.items.insert(id, item);
        if record_undo {
            self.undo_history
                .push(Memento::new(UndoOp::Add { item_id: id }));
        }
        Ok(id)
    }

    /// Apply `edit` to the item under a transaction: the pre-edit state is
    /// captured first, the item is fully de-indexed, and if the edited
    /// path collides with a different item's reservation everything
    /// (fields, index entries, path reservation, undo history) is put
    /// back exactly as it was before returning the error.
    pub fn edit_item<F>(&mut self, id: Uuid, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Item),
    {
        let Some(item) = self.items.get_mut(&id) else {
            return Err(CarrelError::ItemNotFound(id));
        };
        let before = item.clone();
        let previous_path = normalized_path(before.file_path());

        self.undo_history.push(Memento::new(UndoOp::Edit {
            before: before.clone(),
        }));
        if let Some(path) = &previous_path {
            self.unique_paths.remove(path);
        }
        self.index.remove(id);

        edit(item);

        let updated_path = normalized_path(item.file_path());
        let path_changed = updated_path != previous_path;
        if let Some(path) = &updated_path {
            if path_changed && self.unique_paths.contains(path) {
                item.restore_from(&before);
                self.index.insert(item);
                if let Some(previous) = previous_path {
                    self.unique_paths.insert(previous);
                }
                self.undo_history.pop();
                return Err(CarrelError::DuplicatePath(path.clone()));
            }
        }

        if let Some(path) = updated_path {
            self.unique_paths.insert(path);
        }
        self.index.insert(item);
        Ok(())
    }

    /// Delete an item and every task that references it. Returns false
    /// when the id no longer resolves.
    pub fn delete_item(&mut self, id: Uuid) -> bool {
        match self.remove_item_internal(id) {
            Some((item, tasks)) => {
                self.undo_history
                    .push(Memento::new(UndoOp::Delete { item, tasks }));
                true
            }
            None => false,
        }
    }

    fn remove_item_internal(&mut self, id: Uuid) -> Option<(Item, Vec<Task>)> {
        let item = self.items.remove(&id)?;
        let tasks = self.tasks.remove_for_item(id);
        self.recent.forget(id);
        if let Some(path) = normalized_path(item.file_path()) {
            self.unique_paths.remove(&path);
        }
        self.index.remove(id);
        Some((item, tasks))
    }

    pub fn item(&self, id: Uuid) -> Option<Item> {
        self.items.get(&id).cloned()
    }

    /// Every item, sorted by title (case-insensitive).
    pub fn items(&self) -> Vec<Item> {
        search::all_by_title(&self.items)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ranked keyword search; a blank query degrades to the full listing
    /// sorted by title.
    pub fn search(&self, query: &str) -> Vec<Item> {
        search::run(&self.items, &self.index, query)
    }

    /// Current tag reference counts, as a defensive copy.
    pub fn tag_frequency(&self) -> HashMap<String, u32> {
        self.index.tag_frequency().clone()
    }

    // --- Undo ---

    /// Reverse the most recent mutation. Returns false when the history
    /// is empty or the recorded entity no longer resolves. Reversals are
    /// silent: they never record mementos of their own.
    pub fn undo(&mut self) -> bool {
        let Some(memento) = self.undo_history.pop() else {
            return false;
        };

        match memento.into_op() {
            UndoOp::Add { item_id } => self.remove_item_internal(item_id).is_some(),
            UndoOp::Edit { before } => {
                let id = before.id();
                let Some(item) = self.items.get_mut(&id) else {
                    return false;
                };
                if let Some(path) = normalized_path(item.file_path()) {
                    self.unique_paths.remove(&path);
                }
                self.index.remove(id);
                item.restore_from(&before);
                if let Some(path) = normalized_path(item.file_path()) {
                    self.unique_paths.insert(path);
                }
                self.index.insert(item);
                true
            }
            UndoOp::Delete { item, tasks } => match self.add_item_internal(item, false) {
                Ok(_) => {
                    for task in tasks {
                        self.tasks.add(task);
                    }
                    true
                }
                Err(_) => false,
            },
            UndoOp::TaskDelete { task } => {
                self.tasks.add(task);
                true
            }
            UndoOp::TaskEdit { tasks } => {
                for task in tasks {
                    self.tasks.add(task);
                }
                true
            }
        }
    }

    pub fn has_undo(&self) -> bool {
        !self.undo_history.is_empty()
    }

    // --- Tasks ---

    /// Register a follow-up task. Task creation is not undoable; only
    /// completion, edits and cascade deletion enter the undo history.
    pub fn add_task(&mut self, task: Task) -> Uuid {
        let id = task.id();
        self.tasks.add(task);
        id
    }

    pub fn task(&self, id: Uuid) -> Option<Task> {
        self.tasks.get(id).cloned()
    }

    /// Complete (remove) a task, recording it for undo. Returns false
    /// when the id no longer resolves.
    pub fn complete_task(&mut self, id: Uuid) -> bool {
        match self.tasks.remove(id) {
            Some(task) => {
                self.undo_history
                    .push(Memento::new(UndoOp::TaskDelete { task }));
                true
            }
            None => false,
        }
    }

    /// Apply `edit` to a task, recording its prior state for undo.
    pub fn edit_task<F>(&mut self, id: Uuid, edit: F) -> bool
    where
        F: FnOnce(&mut Task),
    {
        let Some(mut task) = self.tasks.remove(id) else {
            return false;
        };
        let before = task.clone();
        edit(&mut task);
        self.tasks.add(task);
        self.undo_history
            .push(Memento::new(UndoOp::TaskEdit {
                tasks: vec![before],
            }));
        true
    }

    pub fn peek_next_task(&self) -> Option<Task> {
        self.tasks.peek_next()
    }

    pub fn tasks_by_urgency(&self) -> Vec<Task> {
        self.tasks.all_by_urgency()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    // --- View history ---

    /// Record a view. Unknown ids are ignored so the stack never holds
    /// dangling references.
    pub fn mark_viewed(&mut self, id: Uuid) -> bool {
        if !self.items.contains_key(&id) {
            return false;
        }
        self.recent.mark(id);
        true
    }

    /// Recently viewed items, most recent first.
    pub fn recently_viewed(&self) -> Vec<Item> {
        self.recent
            .ids()
            .into_iter()
            .filter_map(|id| self.items.get(&id).cloned())
            .collect()
    }

    /// Browser-style back navigation from `current`.
    pub fn navigate_back(&mut self, current: Uuid) -> Option<Item> {
        let previous = self.recent.navigate_back(current)?;
        self.items.get(&previous).cloned()
    }

    // --- Whole-state operations ---

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
        self.unique_paths.clear();
        self.undo_history.clear();
        self.tasks.clear();
        self.recent.clear();
    }

    /// Deep-copied full state for the persistence boundary.
    pub fn create_snapshot(&self) -> LibrarySnapshot {
        let parts = self.index.to_parts();
        LibrarySnapshot {
            items: self.items(),
            keyword_index: parts.keyword_to_items,
            item_keywords: parts.item_keywords,
            item_tags: parts.item_tags,
            tag_frequency: parts.tag_frequency,
            unique_paths: self.unique_paths.clone(),
            recently_viewed: self.recent.ids(),
            undo_history: self.undo_history.clone(),
            tasks: self.tasks.all(),
        }
    }

    /// Clear current state and rebuild every structure from the snapshot.
    pub fn restore_snapshot(&mut self, snapshot: LibrarySnapshot) {
        let limit = self.recent.limit();
        self.clear();

        let LibrarySnapshot {
            items,
            keyword_index,
            item_keywords,
            item_tags,
            tag_frequency,
            unique_paths,
            recently_viewed,
            undo_history,
            tasks,
        } = snapshot;

        for item in items {
            self.items.insert(item.id(), item);
        }
        self.index = KeywordIndex::from_parts(IndexParts {
            keyword_to_items: keyword_index,
            item_keywords,
            item_tags,
            tag_frequency,
        });
        self.unique_paths = unique_paths;
        for task in tasks {
            self.tasks.add(task);
        }
        self.undo_history = undo_history;

        let known = recently_viewed
            .into_iter()
            .filter(|id| self.items.contains_key(id));
        self.recent = RecentlyViewed::from_ids(known, limit);
    }
}

/// Canonical form used by the uniqueness set: absolute, lexically
/// normalized, lowercased. Blank paths carry no reservation. Nothing
/// here touches the filesystem; the working directory merely supplies
/// the base for relative input.
fn normalized_path(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    let path = Path::new(raw);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => return Some(raw.to_lowercase()),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    Some(normalized.to_string_lossy().to_lowercase())
}
