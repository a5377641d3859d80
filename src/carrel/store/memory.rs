use super::SnapshotStore;
use crate::error::Result;
use crate::snapshot::LibrarySnapshot;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    snapshot: Option<LibrarySnapshot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemoryStore {
    fn save(&mut self, snapshot: &LibrarySnapshot) -> Result<()> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<LibrarySnapshot>> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Library;
    use crate::model::{Category, Item};

    #[test]
    fn holds_the_last_saved_snapshot() {
        let mut store = InMemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let mut library = Library::new();
        library
            .add_item(Item::new("Only", Category::Other, None))
            .unwrap();
        store.save(&library.create_snapshot()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].title(), "Only");
    }
}
