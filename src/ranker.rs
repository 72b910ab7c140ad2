// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Zoned tf-idf scoring, length normalization, and metadata boosts.
//!
//! Scoring, normalization, and boosting are three separate passes so the
//! feedback refiner can re-score an augmented bag through the exact same
//! pipeline the first ranking used.

use crate::store::dictionary::zone_of;
use crate::store::IndexStore;
use std::collections::HashMap;

/// Title-zone postings count double towards a document's score; every
/// other zone counts at face value. DO NOT change without also updating
/// the feedback refiner's `q0`/`vd` weighting - they must agree.
pub const TITLE_ZONE_WEIGHT: f64 = 2.0;
pub const OTHER_ZONE_WEIGHT: f64 = 1.0;

/// Floor under a document's length when normalizing a raw score. Not a
/// numerical-stability epsilon in the usual sense - the reference scorer
/// picks 1.0 specifically, so a document with a recorded length below 1.0
/// is normalized as if its length were exactly 1.0.
pub const LENGTH_NORM_EPSILON: f64 = 1.0;

pub fn zone_weight(zoned_term: &str) -> f64 {
    if zone_of(zoned_term) == "title" {
        TITLE_ZONE_WEIGHT
    } else {
        OTHER_ZONE_WEIGHT
    }
}

/// Per-stem contribution to the score map: every document carrying any
/// zoned form of `stem`, weighted by tf/qf/idf/zone. Split out of
/// [`score_documents`] so the `parallel` feature can fan this out one
/// stem per task and reduce the partial maps instead of duplicating the
/// inner loop.
fn score_stem(stem: &str, qf: u32, store: &IndexStore) -> HashMap<u32, f64> {
    let mut partial = HashMap::new();
    let zones = store.zones_of(stem);
    if zones.is_empty() {
        return partial;
    }
    let df_sum: u64 = zones
        .iter()
        .filter_map(|z| store.doc_freq(z))
        .map(u64::from)
        .sum();
    if df_sum == 0 {
        return partial;
    }
    let idf = (store.n() as f64 / df_sum as f64).log10();

    for zone in zones {
        let weight = zone_weight(zone);
        for entry in store.postings(zone) {
            if entry.tf == 0 {
                continue;
            }
            let tf_w = 1.0 + (entry.tf as f64).log10();
            let qf_w = 1.0 + (qf as f64).log10();
            *partial.entry(entry.doc_id).or_insert(0.0) += tf_w * qf_w * idf * weight;
        }
    }
    partial
}

fn merge_scores(mut a: HashMap<u32, f64>, b: HashMap<u32, f64>) -> HashMap<u32, f64> {
    for (doc_id, score) in b {
        *a.entry(doc_id).or_insert(0.0) += score;
    }
    a
}

/// Raw zoned tf-idf score per candidate document, before length
/// normalization or metadata boosts. Scores each stem in the bag across
/// rayon's thread pool when the `parallel` feature is enabled - query
/// bags from feedback expansion or long free-text queries can carry
/// enough stems, each touching its own postings lists, to be worth
/// fanning out.
#[cfg(feature = "parallel")]
pub fn score_documents(bag: &HashMap<String, u32>, store: &IndexStore) -> HashMap<u32, f64> {
    use rayon::prelude::*;

    bag.par_iter()
        .map(|(stem, &qf)| score_stem(stem, qf, store))
        .reduce(HashMap::new, merge_scores)
}

#[cfg(not(feature = "parallel"))]
pub fn score_documents(bag: &HashMap<String, u32>, store: &IndexStore) -> HashMap<u32, f64> {
    let mut scores: HashMap<u32, f64> = HashMap::new();
    for (stem, &qf) in bag {
        scores = merge_scores(scores, score_stem(stem, qf, store));
    }

    scores
}

/// Length-normalizes in place, then applies court/date boosts for
/// documents with metadata on record.
pub fn normalize_and_boost(scores: &mut HashMap<u32, f64>, store: &IndexStore) {
    for (&doc_id, score) in scores.iter_mut() {
        let length = store.doc_length(doc_id).max(LENGTH_NORM_EPSILON);
        *score /= length;

        if let Some(meta) = store.metadata(doc_id) {
            *score *= store.court_boost(&meta.court);
            *score *= store.date_boost(&meta.date);
        }
    }
}

/// Orders by descending score, ties broken by ascending doc_id.
pub fn rank(scores: HashMap<u32, f64>) -> Vec<(u32, f64)> {
    let mut ranked: Vec<(u32, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    ranked
}
