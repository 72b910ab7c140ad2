// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Porter stemming, shared by the indexer and the retriever.
//!
//! The dictionary on disk is keyed by stems produced at index-build time.
//! If the retriever's stemmer disagrees with the indexer's even slightly,
//! every lookup desynchronizes silently - no error, just queries that
//! never match anything. `rust-stemmers`' Porter2 ("english") algorithm is
//! the same implementation the index builder uses, so this module is a
//! thin, deliberately non-clever wrapper around it rather than a
//! hand-rolled stemmer that could drift.

use rust_stemmers::{Algorithm, Stemmer};
use std::sync::LazyLock;

static STEMMER: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::English));

/// Stem a single already-lowercased, punctuation-free word.
#[inline]
pub fn stem(word: &str) -> String {
    STEMMER.stem(word).into_owned()
}

/// Lowercase and strip ASCII punctuation from a token, per `string.punctuation`
/// in the reference implementation. Returns `None` if nothing is left.
pub fn normalize_word(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Normalize and stem a raw token; `None` if the token strips to nothing.
pub fn normalize_and_stem(raw: &str) -> Option<String> {
    normalize_word(raw).map(|w| stem(&w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_plurals_and_verb_forms() {
        assert_eq!(stem("liability"), "liabil");
        assert_eq!(stem("damages"), "damag");
        assert_eq!(stem("running"), "run");
    }

    #[test]
    fn normalize_strips_punctuation_and_lowercases() {
        assert_eq!(normalize_word("Fair!"), Some("fair".to_string()));
        assert_eq!(normalize_word("..."), None);
        assert_eq!(normalize_word(""), None);
    }

    #[test]
    fn normalize_and_stem_composes() {
        assert_eq!(normalize_and_stem("Trials,"), Some("trial".to_string()));
    }
}
