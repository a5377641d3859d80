use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Item, Task};

/// What a memento knows how to reverse. One payload shape per operation
/// kind, so every undo branch is exhaustively checkable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum UndoOp {
    /// Reversing an add means removing the item again; the id is all that
    /// is needed.
    Add { item_id: Uuid },
    /// Full pre-edit snapshot of the item's fields.
    Edit { before: Item },
    /// The deleted item together with every task that was cascade-deleted
    /// with it. Owned copies, never references to the removed entities.
    Delete { item: Item, tasks: Vec<Task> },
    TaskDelete { task: Task },
    TaskEdit { tasks: Vec<Task> },
}

/// Immutable record of one mutation, owned exclusively by the undo
/// history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memento {
    recorded_at: DateTime<Utc>,
    op: UndoOp,
}

impl Memento {
    pub fn new(op: UndoOp) -> Self {
        Self {
            recorded_at: Utc::now(),
            op,
        }
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn op(&self) -> &UndoOp {
        &self.op
    }

    pub(crate) fn into_op(self) -> UndoOp {
        self.op
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    #[test]
    fn edit_snapshot_is_detached_from_the_live_item() {
        let mut item = Item::new("Original", Category::Paper, None);
        let memento = Memento::new(UndoOp::Edit {
            before: item.clone(),
        });

        item.set_title("Changed");

        match memento.op() {
            UndoOp::Edit { before } => assert_eq!(before.title(), "Original"),
            other => panic!("unexpected op: {:?}", other),
        }
    }
}
