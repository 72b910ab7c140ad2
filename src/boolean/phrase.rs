// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Phrase matching: a sequence of stems must occur at consecutive
//! positions within postings that carry position data.
//!
//! Positions are per-zone: a document's `title` occurrence of a stem and
//! its `content` occurrence are tracked separately. A phrase spanning
//! `s1`'s title position and `s2`'s content position is not a match -
//! cross-zone alignment is not attempted, only true in-document adjacency
//! within whichever zones the postings happen to cover for each doc.

use crate::store::dictionary::zone_of;
use crate::store::IndexStore;
use std::collections::HashMap;

/// Positions recorded for one stem in one document, keyed by `(doc_id,
/// zone)` rather than doc_id alone - a term appearing in both `title` and
/// `content` for the same doc must stay two separate position lists, or a
/// phrase could advance from one stem's title occurrence to the next
/// stem's content occurrence and falsely report adjacency.
fn positions_by_doc_zone(stem: &str, store: &IndexStore) -> HashMap<(u32, String), Vec<u32>> {
    let mut by_doc_zone: HashMap<(u32, String), Vec<u32>> = HashMap::new();
    for zoned_term in store.zones_of(stem) {
        let zone = zone_of(zoned_term).to_string();
        for entry in store.postings(zoned_term) {
            if entry.positions.is_empty() {
                continue;
            }
            by_doc_zone
                .entry((entry.doc_id, zone.clone()))
                .or_default()
                .extend(entry.positions.iter().copied());
        }
    }
    by_doc_zone
}

/// Returns the sorted doc_ids where `stems` occur as a contiguous phrase
/// within a single zone.
///
/// A single-stem phrase degenerates to "docs where this stem has recorded
/// positions" - the same as a free-text single term match.
pub fn match_phrase(stems: &[String], store: &IndexStore) -> Vec<u32> {
    if stems.is_empty() {
        return Vec::new();
    }

    if store.zones_of(&stems[0]).is_empty() {
        return Vec::new();
    }
    let mut candidates = positions_by_doc_zone(&stems[0], store);
    if candidates.is_empty() {
        return Vec::new();
    }

    for stem in &stems[1..] {
        if candidates.is_empty() {
            break;
        }
        if store.zones_of(stem).is_empty() {
            return Vec::new();
        }
        let next_positions = positions_by_doc_zone(stem, store);

        let mut advanced: HashMap<(u32, String), Vec<u32>> = HashMap::new();
        for ((doc_id, zone), prev_positions) in &candidates {
            let Some(curr) = next_positions.get(&(*doc_id, zone.clone())) else {
                continue;
            };
            let next: Vec<u32> = prev_positions
                .iter()
                .filter(|&&p| curr.contains(&(p + 1)))
                .map(|&p| p + 1)
                .collect();
            if !next.is_empty() {
                advanced.insert((*doc_id, zone.clone()), next);
            }
        }
        candidates = advanced;
    }

    let mut ids: Vec<u32> = candidates.into_keys().map(|(doc_id, _)| doc_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
