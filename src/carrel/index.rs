//! The keyword index: an inverted token → item-id map plus a tag
//! reference-count table, with the per-item reverse sets needed to remove
//! an item without rescanning it.
//!
//! The four structures move together: every insert or removal updates all
//! of them in one call, and an edit is always remove-then-reinsert, never
//! a merge of old and new keyword sets.

use std::collections::{BTreeSet, HashMap, HashSet};
use uuid::Uuid;

use crate::model::Item;

#[derive(Debug, Default, Clone)]
pub struct KeywordIndex {
    keyword_to_items: HashMap<String, HashSet<Uuid>>,
    item_keywords: HashMap<Uuid, BTreeSet<String>>,
    item_tags: HashMap<Uuid, BTreeSet<String>>,
    tag_frequency: HashMap<String, u32>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an item's keyword and tag sets. The caller guarantees the
    /// item is not already indexed (edits remove first).
    pub fn insert(&mut self, item: &Item) {
        let keywords = item.keywords();
        for keyword in &keywords {
            self.keyword_to_items
                .entry(keyword.clone())
                .or_default()
                .insert(item.id());
        }
        self.item_keywords.insert(item.id(), keywords);

        let tags = item.tags().clone();
        for tag in &tags {
            *self.tag_frequency.entry(tag.clone()).or_insert(0) += 1;
        }
        self.item_tags.insert(item.id(), tags);
    }

    /// Reverse of [`insert`](Self::insert): drop the item from every token
    /// bucket (deleting buckets that empty out) and decrement its tags'
    /// counters, removing tags that reach zero.
    pub fn remove(&mut self, item_id: Uuid) {
        if let Some(keywords) = self.item_keywords.remove(&item_id) {
            for keyword in keywords {
                if let Some(bucket) = self.keyword_to_items.get_mut(&keyword) {
                    bucket.remove(&item_id);
                    if bucket.is_empty() {
                        self.keyword_to_items.remove(&keyword);
                    }
                }
            }
        }

        if let Some(tags) = self.item_tags.remove(&item_id) {
            for tag in tags {
                if let Some(count) = self.tag_frequency.get_mut(&tag) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        self.tag_frequency.remove(&tag);
                    }
                }
            }
        }
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&String, &HashSet<Uuid>)> {
        self.keyword_to_items.iter()
    }

    pub fn tag_count(&self, tag: &str) -> Option<u32> {
        self.tag_frequency.get(tag).copied()
    }

    pub fn tag_frequency(&self) -> &HashMap<String, u32> {
        &self.tag_frequency
    }

    pub fn keywords_for(&self, item_id: Uuid) -> Option<&BTreeSet<String>> {
        self.item_keywords.get(&item_id)
    }

    pub fn clear(&mut self) {
        self.keyword_to_items.clear();
        self.item_keywords.clear();
        self.item_tags.clear();
        self.tag_frequency.clear();
    }

    /// Deep copies of the four structures, for snapshots.
    pub(crate) fn to_parts(&self) -> IndexParts {
        IndexParts {
            keyword_to_items: self.keyword_to_items.clone(),
            item_keywords: self.item_keywords.clone(),
            item_tags: self.item_tags.clone(),
            tag_frequency: self.tag_frequency.clone(),
        }
    }

    pub(crate) fn from_parts(parts: IndexParts) -> Self {
        Self {
            keyword_to_items: parts.keyword_to_items,
            item_keywords: parts.item_keywords,
            item_tags: parts.item_tags,
            tag_frequency: parts.tag_frequency,
        }
    }
}

/// The index's four structures as plain data, used by
/// [`LibrarySnapshot`](crate::snapshot::LibrarySnapshot).
#[derive(Debug, Clone)]
pub(crate) struct IndexParts {
    pub keyword_to_items: HashMap<String, HashSet<Uuid>>,
    pub item_keywords: HashMap<Uuid, BTreeSet<String>>,
    pub item_tags: HashMap<Uuid, BTreeSet<String>>,
    pub tag_frequency: HashMap<String, u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn item(title: &str, tags: &[&str]) -> Item {
        let mut item = Item::new(title, Category::LectureNotes, None);
        for tag in tags {
            item.add_tag(tag);
        }
        item
    }

    #[test]
    fn insert_populates_all_four_structures() {
        let mut index = KeywordIndex::new();
        let a = item("Graph Lecture", &["notes"]);
        index.insert(&a);

        let bucket = index
            .buckets()
            .find(|(k, _)| k.as_str() == "graph")
            .map(|(_, ids)| ids.clone())
            .unwrap();
        assert!(bucket.contains(&a.id()));
        assert_eq!(index.tag_count("notes"), Some(1));
        assert!(index.keywords_for(a.id()).unwrap().contains("lecture"));
        assert!(index.keywords_for(a.id()).unwrap().contains("notes"));
    }

    #[test]
    fn remove_is_the_exact_inverse_of_insert() {
        let mut index = KeywordIndex::new();
        let a = item("Graph Lecture", &["notes"]);
        let b = item("Graph Tutorial", &["notes"]);
        index.insert(&a);
        index.insert(&b);

        index.remove(a.id());

        // Shared bucket shrinks but survives; a's exclusive tokens vanish.
        let graph_bucket = index
            .buckets()
            .find(|(k, _)| k.as_str() == "graph")
            .map(|(_, ids)| ids.clone())
            .unwrap();
        assert_eq!(graph_bucket.len(), 1);
        assert!(graph_bucket.contains(&b.id()));
        assert!(index.buckets().all(|(k, _)| k.as_str() != "lecture"));
        assert_eq!(index.tag_count("notes"), Some(1));
        assert!(index.keywords_for(a.id()).is_none());

        index.remove(b.id());
        assert_eq!(index.buckets().count(), 0);
        assert_eq!(index.tag_count("notes"), None);
    }

    #[test]
    fn removing_an_unknown_item_is_a_no_op() {
        let mut index = KeywordIndex::new();
        let a = item("Graph Lecture", &["notes"]);
        index.insert(&a);

        index.remove(Uuid::new_v4());
        assert_eq!(index.tag_count("notes"), Some(1));
        assert!(index.keywords_for(a.id()).is_some());
    }

    #[test]
    fn shared_tag_counts_track_membership() {
        let mut index = KeywordIndex::new();
        let a = item("A", &["exam", "notes"]);
        let b = item("B", &["exam"]);
        index.insert(&a);
        index.insert(&b);
        assert_eq!(index.tag_count("exam"), Some(2));
        assert_eq!(index.tag_count("notes"), Some(1));

        index.remove(b.id());
        assert_eq!(index.tag_count("exam"), Some(1));
    }
}
