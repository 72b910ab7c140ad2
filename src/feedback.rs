// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Rocchio pseudo-relevance feedback: after an initial free-text ranking,
//! pull a handful of expansion terms from the top results and re-rank.
//!
//! Document vectors are built over every zoned term that appears anywhere
//! in the feedback set, not just zones already belonging to the original
//! query's terms - restricting to the latter would make an "expansion"
//! term always land back on a term already in the bag and get filtered
//! out as a no-op, which defeats the point of expanding at all.

use crate::ranker::zone_weight;
use crate::store::dictionary::base_of;
use crate::store::IndexStore;
use std::collections::HashMap;

pub const FEEDBACK_K: usize = 30;
pub const ALPHA: f64 = 1.5;
pub const BETA: f64 = 0.4;
const MIN_EXPANSION_STEM_LEN: usize = 3;

fn idf(zoned_term: &str, store: &IndexStore) -> Option<f64> {
    let df = store.doc_freq(zoned_term)?;
    if df == 0 {
        return None;
    }
    Some((store.n() as f64 / df as f64).log10())
}

fn build_q0(bag: &HashMap<String, u32>, store: &IndexStore) -> HashMap<String, f64> {
    let mut q0 = HashMap::new();
    for (stem, &qf) in bag {
        for zone in store.zones_of(stem) {
            let Some(idf) = idf(zone, store) else { continue };
            let weight = (1.0 + (qf as f64).log10()) * idf * zone_weight(zone);
            *q0.entry(zone.clone()).or_insert(0.0) += weight;
        }
    }
    q0
}

/// Document vectors for every feedback doc, over the union of zoned terms
/// that appear anywhere in the feedback set. Scans the full vocabulary
/// once per call - acceptable at this crate's scale, since there is no
/// forward index to look a document's terms up directly.
fn build_feedback_vectors(feedback: &[u32], store: &IndexStore) -> HashMap<u32, HashMap<String, f64>> {
    let feedback_set: std::collections::HashSet<u32> = feedback.iter().copied().collect();
    let mut vectors: HashMap<u32, HashMap<String, f64>> = HashMap::new();

    for zoned_term in store.zoned_terms().map(str::to_string).collect::<Vec<_>>() {
        let Some(idf) = idf(&zoned_term, store) else { continue };
        for entry in store.postings(&zoned_term) {
            if !feedback_set.contains(&entry.doc_id) || entry.tf == 0 {
                continue;
            }
            let weight = (1.0 + (entry.tf as f64).log10()) * idf;
            vectors
                .entry(entry.doc_id)
                .or_default()
                .insert(zoned_term.clone(), weight);
        }
    }
    vectors
}

/// Takes the top-`m` zoned terms of `q1` by weight, then filters - a
/// top-`m` candidate that fails the digit/length/already-in-bag check is
/// dropped, not replaced by the next-ranked term below the cutoff. This
/// can yield fewer than `m` expansion stems; it never looks past the
/// slice to backfill.
fn select_expansion_terms(
    q1: &HashMap<String, f64>,
    bag: &HashMap<String, u32>,
    m: usize,
) -> Vec<String> {
    let mut ranked: Vec<(&String, &f64)> = q1.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(m);

    let mut accepted = Vec::new();
    for (zoned_term, _) in ranked {
        let base = base_of(zoned_term);
        if base.chars().any(|c| c.is_ascii_digit()) || base.len() < MIN_EXPANSION_STEM_LEN {
            continue;
        }
        if bag.contains_key(base) || accepted.contains(&base.to_string()) {
            continue;
        }
        accepted.push(base.to_string());
    }
    accepted
}

/// Runs the full Rocchio step: build `q0`/`vd`/`q1`, select expansion
/// terms, and return an augmented bag. Returns `None` when the feedback
/// set is empty (caller should keep the original ranking unchanged).
pub fn refine(
    bag: &HashMap<String, u32>,
    ranked_ids: &[u32],
    store: &IndexStore,
) -> Option<HashMap<String, u32>> {
    let feedback: Vec<u32> = ranked_ids.iter().take(FEEDBACK_K).copied().collect();
    if feedback.is_empty() {
        return None;
    }

    let q0 = build_q0(bag, store);
    let doc_vectors = build_feedback_vectors(&feedback, store);

    let mut q1: HashMap<String, f64> = HashMap::new();
    for (zoned_term, w) in &q0 {
        *q1.entry(zoned_term.clone()).or_insert(0.0) += ALPHA * w;
    }
    let n_feedback = feedback.len() as f64;
    for doc_id in &feedback {
        let Some(vd) = doc_vectors.get(doc_id) else { continue };
        for (zoned_term, w) in vd {
            *q1.entry(zoned_term.clone()).or_insert(0.0) += (BETA / n_feedback) * w;
        }
    }

    let any_digit_token = bag.keys().any(|t| t.chars().all(|c| c.is_ascii_digit()));
    let m = if any_digit_token { 1 } else { 2 };

    let mut augmented = bag.clone();
    for stem in select_expansion_terms(&q1, bag, m) {
        augmented.insert(stem, 1);
    }
    Some(augmented)
}
