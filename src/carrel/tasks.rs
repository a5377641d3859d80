//! Urgency-ordered task scheduling.
//!
//! Urgency is a function of the wall clock, so no container ordering can
//! be trusted between calls: the board keeps tasks id-indexed and computes
//! order at read time, with a single `now` per read so one listing is
//! internally consistent.

use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use crate::model::Task;

#[derive(Debug, Default, Clone)]
pub struct TaskBoard {
    tasks: HashMap<Uuid, Task>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id.
    pub fn add(&mut self, task: Task) {
        self.tasks.insert(task.id(), task);
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Task> {
        self.tasks.remove(&id)
    }

    /// Remove every task owned by `item_id`, returning the removed tasks.
    /// Linear over the current tasks, which is fine at the scale the board
    /// is built for (tens to low thousands).
    pub fn remove_for_item(&mut self, item_id: Uuid) -> Vec<Task> {
        let doomed: Vec<Uuid> = self
            .tasks
            .values()
            .filter(|task| task.item_id() == item_id)
            .map(Task::id)
            .collect();
        doomed
            .into_iter()
            .filter_map(|id| self.tasks.remove(&id))
            .collect()
    }

    /// Highest-urgency task right now, without removal.
    pub fn peek_next(&self) -> Option<Task> {
        let now = Utc::now();
        self.tasks
            .values()
            .max_by(|a, b| a.urgency_at(now).total_cmp(&b.urgency_at(now)))
            .cloned()
    }

    /// Full listing, re-sorted by urgency on every call. Equal urgency
    /// falls back to the earlier deadline.
    pub fn all_by_urgency(&self) -> Vec<Task> {
        let now = Utc::now();
        let mut all: Vec<Task> = self.tasks.values().cloned().collect();
        all.sort_by(|a, b| {
            b.urgency_at(now)
                .total_cmp(&a.urgency_at(now))
                .then_with(|| a.deadline().cmp(&b.deadline()))
        });
        all
    }

    /// Every task, in creation order. Snapshot export; listings that care
    /// about urgency use [`all_by_urgency`](Self::all_by_urgency).
    pub fn all(&self) -> Vec<Task> {
        let mut all: Vec<Task> = self.tasks.values().cloned().collect();
        all.sort_by(|a, b| a.created_at().cmp(&b.created_at()).then_with(|| a.id().cmp(&b.id())));
        all
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
