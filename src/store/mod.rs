// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! The Index Store: opens the three on-disk index files and serves
//! read-only lookups to everything downstream.
//!
//! Opened once at startup. Every field is immutable thereafter, so an
//! `Engine` can be wrapped in an `Arc` and shared across concurrent
//! queries without any locking.

pub mod dictionary;
pub mod metadata;
pub mod postings;

use crate::error::Result;
use crate::observer::SearchObserver;
use dictionary::Dictionary;
use metadata::Metadata;
use postings::{PostingEntry, PostingsFile};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

pub struct IndexStore {
    dictionary: Dictionary,
    postings: PostingsFile,
    metadata: Metadata,
    observer: Arc<dyn SearchObserver>,
}

impl IndexStore {
    pub fn open(
        dict_path: &Path,
        postings_path: &Path,
        metadata_path: &Path,
        observer: Arc<dyn SearchObserver>,
    ) -> Result<Self> {
        let dictionary = Dictionary::load(dict_path)?;
        let postings = PostingsFile::open(postings_path)?;

        if !metadata_path.exists() {
            warn!(path = %metadata_path.display(), "metadata file missing, all boosts default to 1.0");
        }
        let metadata = Metadata::load(metadata_path)?;

        Ok(IndexStore {
            dictionary,
            postings,
            metadata,
            observer,
        })
    }

    /// Postings for one exact zoned term (`stem@zone`), e.g. `"liabil@title"`.
    ///
    /// A decode failure degrades to empty postings for this term: the rest
    /// of the query still runs, it just behaves as if this term were
    /// absent from the corpus.
    pub fn postings(&self, zoned_term: &str) -> Vec<PostingEntry> {
        let Some(entry) = self.dictionary.get(zoned_term) else {
            return Vec::new();
        };
        match self.postings.line_at(entry.offset) {
            Ok(entries) => entries,
            Err(_) => {
                self.observer.on_postings_decode_failure(zoned_term);
                Vec::new()
            }
        }
    }

    /// Postings for a bare stem across every zone it appears in. Order
    /// across zones is not guaranteed to correspond to any single zone's
    /// on-disk ordering or skip strides - callers that need ascending
    /// doc_id order (the boolean evaluator) must re-sort, and must not
    /// trust skip values carried on these entries (see `boolean::Candidate`).
    pub fn postings_all(&self, base: &str) -> Vec<PostingEntry> {
        let mut out = Vec::new();
        for zone in self.dictionary.zones_of(base) {
            out.extend(self.postings(zone));
        }
        out
    }

    pub fn zones_of(&self, base: &str) -> &[String] {
        self.dictionary.zones_of(base)
    }

    pub fn bases(&self) -> impl Iterator<Item = &str> {
        self.dictionary.bases()
    }

    pub fn zoned_terms(&self) -> impl Iterator<Item = &str> {
        self.dictionary.zoned_terms()
    }

    pub fn doc_freq(&self, zoned_term: &str) -> Option<u32> {
        self.dictionary.doc_freq(zoned_term)
    }

    pub fn n(&self) -> u64 {
        self.postings.n()
    }

    pub fn doc_length(&self, doc_id: u32) -> f64 {
        self.postings.doc_length(doc_id)
    }

    pub fn metadata(&self, doc_id: u32) -> Option<&metadata::DocMeta> {
        self.metadata.get(doc_id)
    }

    pub fn court_boost(&self, court: &str) -> f64 {
        metadata::court_boost(court)
    }

    pub fn date_boost(&self, date: &str) -> f64 {
        metadata::date_boost(date, metadata::REFERENCE_YEAR)
    }
}
