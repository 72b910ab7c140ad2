// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! The boolean evaluator: runs a postfix atom sequence over a stack of
//! candidate sets, each sorted ascending by doc_id.
//!
//! `Candidate` is the single tagged shape every stack entry uses, whether
//! it came from a dictionary lookup (which may carry a real skip stride)
//! or from a set operation (which never does). Skip strides only ever
//! come from a single, un-merged zoned-term postings list: once a term
//! atom's postings are merged across zones (see `Store::postings_all`),
//! the original per-zone stride no longer indexes anything meaningful in
//! the merged, re-sorted list, so merged candidates always carry
//! `skip: None`. Correctness never depends on skip strides being present
//! - `intersect_with_skips` with every stride `None` degrades to the
//! naive two-pointer merge, and the evaluator's output is identical
//! either way; skips are a performance hint only.

mod phrase;

use crate::query::{Operand, OpKind, PostfixToken};
use crate::store::IndexStore;

pub use phrase::match_phrase;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub doc_id: u32,
    pub skip: Option<u32>,
}

fn doc_ids(candidates: &[Candidate]) -> Vec<u32> {
    candidates.iter().map(|c| c.doc_id).collect()
}

fn to_candidates(ids: Vec<u32>) -> Vec<Candidate> {
    ids.into_iter().map(|doc_id| Candidate { doc_id, skip: None }).collect()
}

/// Skip-aware AND intersection. Degrades to a naive two-pointer merge when
/// every candidate's `skip` is `None`; with real strides present it jumps
/// ahead whenever the target lands at-or-before the other list's cursor.
pub fn intersect_with_skips(a: &[Candidate], b: &[Candidate]) -> Vec<Candidate> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        if a[i].doc_id == b[j].doc_id {
            out.push(Candidate {
                doc_id: a[i].doc_id,
                skip: None,
            });
            i += 1;
            j += 1;
        } else if a[i].doc_id < b[j].doc_id {
            if let Some(jump) = a[i].skip {
                let target = i + jump as usize;
                if target < a.len() && a[target].doc_id <= b[j].doc_id {
                    i = target;
                    continue;
                }
            }
            i += 1;
        } else {
            if let Some(jump) = b[j].skip {
                let target = j + jump as usize;
                if target < b.len() && b[target].doc_id <= a[i].doc_id {
                    j = target;
                    continue;
                }
            }
            j += 1;
        }
    }
    out
}

fn union(a: &[Candidate], b: &[Candidate]) -> Vec<Candidate> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        match a[i].doc_id.cmp(&b[j].doc_id) {
            std::cmp::Ordering::Less => {
                out.push(Candidate { doc_id: a[i].doc_id, skip: None });
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(Candidate { doc_id: b[j].doc_id, skip: None });
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(Candidate { doc_id: a[i].doc_id, skip: None });
                i += 1;
                j += 1;
            }
        }
    }
    out.extend(a[i..].iter().map(|c| Candidate { doc_id: c.doc_id, skip: None }));
    out.extend(b[j..].iter().map(|c| Candidate { doc_id: c.doc_id, skip: None }));
    out
}

/// Complement against the full doc_id universe `0..n`. `NOT` on its own
/// (with no preceding AND/OR) means "every document that doesn't have
/// this", which requires knowing corpus size - hence it needs the store.
fn complement(candidates: &[Candidate], n: u64) -> Vec<Candidate> {
    let present: std::collections::HashSet<u32> = candidates.iter().map(|c| c.doc_id).collect();
    (0..n as u32)
        .filter(|id| !present.contains(id))
        .map(|doc_id| Candidate { doc_id, skip: None })
        .collect()
}

fn term_candidates(stem: &str, store: &IndexStore) -> Vec<Candidate> {
    let mut entries = store.postings_all(stem);
    entries.sort_by_key(|e| e.doc_id);
    entries.dedup_by_key(|e| e.doc_id);
    to_candidates(entries.into_iter().map(|e| e.doc_id).collect())
}

fn phrase_candidates(stems: &[String], store: &IndexStore) -> Vec<Candidate> {
    to_candidates(match_phrase(stems, store))
}

/// Evaluate a postfix atom sequence, returning doc_ids in ascending
/// native order (the order every set operation here preserves).
pub fn evaluate(postfix: &[PostfixToken], store: &IndexStore) -> Vec<u32> {
    let mut stack: Vec<Vec<Candidate>> = Vec::new();

    for token in postfix {
        match token {
            PostfixToken::Operand(Operand::Term(stem)) => {
                stack.push(term_candidates(stem, store));
            }
            PostfixToken::Operand(Operand::Phrase(stems)) => {
                stack.push(phrase_candidates(stems, store));
            }
            PostfixToken::Op(OpKind::Not) => {
                let Some(operand) = stack.pop() else { continue };
                stack.push(complement(&operand, store.n()));
            }
            PostfixToken::Op(op @ (OpKind::And | OpKind::Or)) => {
                let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                    // Malformed postfix (shouldn't happen - the parser
                    // validates operator placement before this runs).
                    continue;
                };
                let result = match op {
                    OpKind::And => intersect_with_skips(&lhs, &rhs),
                    OpKind::Or => union(&lhs, &rhs),
                    OpKind::Not => unreachable!(),
                };
                stack.push(result);
            }
        }
    }

    stack.pop().map(|c| doc_ids(&c)).unwrap_or_default()
}

/// Backfills a strict boolean AND-chain's result with free-text ranked
/// results: keeps the first `b` boolean hits, then appends free-text hits
/// (skipping anything already present) until `t` total ids are collected.
pub fn merge_boolean_and_free(boolean_ids: &[u32], free_ids: &[u32], b: usize, t: usize) -> Vec<u32> {
    let mut seen = std::collections::HashSet::new();
    let mut merged = Vec::with_capacity(t.min(boolean_ids.len() + free_ids.len()));

    for &id in boolean_ids.iter().take(b) {
        if seen.insert(id) {
            merged.push(id);
        }
    }
    for &id in free_ids {
        if merged.len() >= t {
            break;
        }
        if seen.insert(id) {
            merged.push(id);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn naive_intersect(a: &[Candidate], b: &[Candidate]) -> Vec<u32> {
        let b_ids: std::collections::HashSet<u32> = b.iter().map(|c| c.doc_id).collect();
        a.iter()
            .map(|c| c.doc_id)
            .filter(|id| b_ids.contains(id))
            .collect()
    }

    #[test]
    fn intersect_matches_common_ids() {
        let a = to_candidates(vec![1, 3, 5, 7, 9]);
        let b = to_candidates(vec![2, 3, 5, 8, 9]);
        let result = doc_ids(&intersect_with_skips(&a, &b));
        assert_eq!(result, vec![3, 5, 9]);
    }

    #[test]
    fn skip_pointers_do_not_change_the_result() {
        // Same lists, but with real forward strides attached.
        let a = vec![
            Candidate { doc_id: 1, skip: Some(2) },
            Candidate { doc_id: 3, skip: None },
            Candidate { doc_id: 5, skip: Some(2) },
            Candidate { doc_id: 7, skip: None },
            Candidate { doc_id: 9, skip: None },
        ];
        let b = to_candidates(vec![2, 3, 5, 8, 9]);
        assert_eq!(doc_ids(&intersect_with_skips(&a, &b)), vec![3, 5, 9]);
    }

    proptest! {
        #[test]
        fn skip_intersection_matches_naive_with_all_strides_disabled(
            mut a in prop::collection::vec(0u32..200, 0..40),
            mut b in prop::collection::vec(0u32..200, 0..40),
        ) {
            a.sort_unstable();
            a.dedup();
            b.sort_unstable();
            b.dedup();
            let ca = to_candidates(a.clone());
            let cb = to_candidates(b.clone());
            let via_skips = doc_ids(&intersect_with_skips(&ca, &cb));
            let naive = naive_intersect(&ca, &cb);
            prop_assert_eq!(via_skips, naive);
        }
    }

    #[test]
    fn union_merges_and_dedups_sorted() {
        let a = to_candidates(vec![1, 3, 5]);
        let b = to_candidates(vec![2, 3, 6]);
        assert_eq!(doc_ids(&union(&a, &b)), vec![1, 2, 3, 5, 6]);
    }

    #[test]
    fn complement_is_everything_else_in_the_universe() {
        let present = to_candidates(vec![1, 3]);
        assert_eq!(doc_ids(&complement(&present, 5)), vec![0, 2, 4]);
    }

    #[test]
    fn fallback_merge_respects_b_and_t_windows() {
        let boolean_ids: Vec<u32> = vec![1, 2, 3];
        let free_ids: Vec<u32> = vec![3, 4, 5, 6];
        let merged = merge_boolean_and_free(&boolean_ids, &free_ids, 2, 4);
        assert_eq!(merged, vec![1, 2, 3, 4]);
    }
}
