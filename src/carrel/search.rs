//! Ranked keyword search over the index plus the raw item list.
//!
//! Scoring per item: accumulated keyword weight (tag frequency, or bucket
//! size for non-tags, half-again for exact token matches), plus half the
//! rating, plus a flat bonus when the title contains the whole query.
//! Ordering: score, then exact-match count, then rating, then creation
//! time, all descending. Ties beyond those keys are not part of the
//! contract.

use std::collections::HashMap;
use uuid::Uuid;

use crate::index::KeywordIndex;
use crate::model::Item;

pub(crate) fn run(items: &HashMap<Uuid, Item>, index: &KeywordIndex, query: &str) -> Vec<Item> {
    let trimmed = query.trim().to_lowercase();
    if trimmed.is_empty() {
        return all_by_title(items);
    }

    let mut accumulators: HashMap<Uuid, ScoreAccumulator> = HashMap::new();

    for token in trimmed.split_whitespace() {
        for (keyword, bucket) in index.buckets() {
            if !keyword.contains(token) {
                continue;
            }
            let exact = keyword.as_str() == token;
            let mut weight = index
                .tag_count(keyword)
                .map(f64::from)
                .unwrap_or(bucket.len() as f64);
            if exact {
                weight *= 1.5;
            }
            for item_id in bucket {
                accumulators
                    .entry(*item_id)
                    .or_default()
                    .boost_keyword(weight, exact);
            }
        }
    }

    for (id, item) in items {
        if item.title().to_lowercase().contains(&trimmed) {
            accumulators.entry(*id).or_default().boost_title();
        }
    }

    let mut ranked: Vec<(Item, f64, u32)> = accumulators
        .into_iter()
        .filter_map(|(id, acc)| {
            items
                .get(&id)
                .map(|item| (item.clone(), acc.score(item), acc.exact_matches))
        })
        .collect();

    ranked.sort_by(|(a, a_score, a_exact), (b, b_score, b_exact)| {
        b_score
            .total_cmp(a_score)
            .then_with(|| b_exact.cmp(a_exact))
            .then_with(|| b.rating().cmp(&a.rating()))
            .then_with(|| b.created_at().cmp(&a.created_at()))
    });

    ranked.into_iter().map(|(item, _, _)| item).collect()
}

pub(crate) fn all_by_title(items: &HashMap<Uuid, Item>) -> Vec<Item> {
    let mut all: Vec<Item> = items.values().cloned().collect();
    all.sort_by(|a, b| a.title().to_lowercase().cmp(&b.title().to_lowercase()));
    all
}

#[derive(Default)]
struct ScoreAccumulator {
    keyword_weight: f64,
    exact_matches: u32,
    title_match: bool,
}

impl ScoreAccumulator {
    fn boost_keyword(&mut self, weight: f64, exact: bool) {
        self.keyword_weight += weight;
        if exact {
            self.exact_matches += 1;
        }
    }

    fn boost_title(&mut self) {
        self.title_match = true;
        self.keyword_weight += 3.0;
    }

    fn score(&self, item: &Item) -> f64 {
        let rating_bonus = f64::from(item.rating()) * 0.5;
        let title_bonus = if self.title_match { 5.0 } else { 0.0 };
        self.keyword_weight + rating_bonus + title_bonus
    }
}
