use std::collections::HashSet;

use crate::model::TrackerDocument;

/// Merges the documents parsed from one message's tracker blocks into a
/// single effective dataset.
///
/// World data is a shallow merge with later blocks overwriting earlier keys.
/// Character lists are concatenated in block order, then deduplicated by name
/// keeping only the last occurrence at its position — never an additive merge
/// of two records with the same name.
pub fn merge(documents: Vec<TrackerDocument>) -> TrackerDocument {
    let mut merged = TrackerDocument::default();

    for document in documents {
        for (key, value) in document.world.fields {
            merged.world.fields.insert(key, value);
        }
        merged.cards.extend(document.cards);
    }

    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(merged.cards.len());
    for card in merged.cards.into_iter().rev() {
        if seen.insert(card.name.clone()) {
            kept.push(card);
        }
    }
    kept.reverse();
    merged.cards = kept;

    merged
}
