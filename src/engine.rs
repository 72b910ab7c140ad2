// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! The public entry point: opens an [`IndexStore`] and runs the full
//! parse -> evaluate -> rank -> (optionally) refine pipeline per query.

use crate::boolean;
use crate::error::{EngineError, Result};
use crate::feedback;
use crate::observer::{SearchObserver, TracingObserver};
use crate::query::{self, ParsedQuery};
use crate::ranker;
use crate::store::IndexStore;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

/// First B boolean doc_ids, then free-text-ranked doc_ids to backfill up
/// to T total. DO NOT change independently of `boolean::merge_boolean_and_free`'s
/// call site below - both constants are a single tuned pair.
pub const FALLBACK_BOOLEAN_PREFIX: usize = 500;
pub const FALLBACK_TOTAL: usize = 500;

/// One ranked result, resolved with the metadata a caller needs to
/// assemble a result snippet without a second round-trip into the store.
/// `title`/snippet text themselves stay with the corpus collaborator that
/// owns document bodies - this crate only ever sees postings, not text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub doc_id: u32,
    pub score: Option<f64>,
    pub court: Option<String>,
    pub date: Option<String>,
}

/// A cooperative cancellation flag checked at pipeline stage boundaries.
/// Cloning shares the same underlying flag; call [`CancelToken::cancel`]
/// from any thread to stop an in-flight query before its next boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct Engine {
    store: IndexStore,
    observer: Arc<dyn SearchObserver>,
}

impl Engine {
    pub fn open(dict_path: &Path, postings_path: &Path, metadata_path: &Path) -> Result<Self> {
        Self::open_with_observer(
            dict_path,
            postings_path,
            metadata_path,
            Arc::new(TracingObserver),
        )
    }

    pub fn open_with_observer(
        dict_path: &Path,
        postings_path: &Path,
        metadata_path: &Path,
        observer: Arc<dyn SearchObserver>,
    ) -> Result<Self> {
        let store = IndexStore::open(dict_path, postings_path, metadata_path, observer.clone())?;
        Ok(Engine { store, observer })
    }

    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<u32>> {
        self.search_with_cancel(query, top_k, None)
    }

    #[instrument(skip(self, cancel), fields(query = query))]
    pub fn search_with_cancel(
        &self,
        query: &str,
        top_k: usize,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<u32>> {
        let started = Instant::now();
        let result = self.run_pipeline(query, top_k, cancel);
        if result.is_ok() {
            self.observer.on_query_evaluated(started.elapsed());
        }
        result.map(|hits| hits.into_iter().map(|(id, _)| id).collect())
    }

    /// Like [`Engine::search`], but resolves each hit's score and metadata
    /// for the caller's snippet-assembly step. Boolean-path hits that came
    /// from the fallback merge (rather than the free-text ranking) carry
    /// `score: None` - the boolean evaluator itself produces an unordered
    /// candidate set, not a score.
    pub fn search_detailed(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let hits = self.run_pipeline(query, top_k, None)?;
        Ok(hits
            .into_iter()
            .map(|(doc_id, score)| {
                let meta = self.store.metadata(doc_id);
                SearchHit {
                    doc_id,
                    score,
                    court: meta.map(|m| m.court.clone()),
                    date: meta.map(|m| m.date.clone()),
                }
            })
            .collect())
    }

    fn check_cancel(&self, cancel: Option<&CancelToken>) -> Result<()> {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Runs the full pipeline, returning `(doc_id, score)` pairs in final
    /// order - `score` is `None` for boolean fallback-merge hits that never
    /// passed through the ranker.
    fn run_pipeline(
        &self,
        raw_query: &str,
        top_k: usize,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<(u32, Option<f64>)>> {
        let parsed = query::parse(raw_query)?;
        self.check_cancel(cancel)?;

        match parsed {
            ParsedQuery::Boolean { postfix, bag } => {
                let boolean_ids = boolean::evaluate(&postfix, &self.store);
                self.check_cancel(cancel)?;

                let mut scores = ranker::score_documents(&bag, &self.store);
                ranker::normalize_and_boost(&mut scores, &self.store);
                let free_ranked = ranker::rank(scores);
                let free_score: std::collections::HashMap<u32, f64> = free_ranked.iter().copied().collect();
                let free_ids: Vec<u32> = free_ranked.into_iter().map(|(id, _)| id).collect();
                self.check_cancel(cancel)?;

                let merged = boolean::merge_boolean_and_free(
                    &boolean_ids,
                    &free_ids,
                    FALLBACK_BOOLEAN_PREFIX,
                    FALLBACK_TOTAL,
                );
                Ok(merged
                    .into_iter()
                    .take(top_k)
                    .map(|id| (id, free_score.get(&id).copied()))
                    .collect())
            }
            ParsedQuery::FreeText { bag } => {
                if bag.is_empty() {
                    return Ok(Vec::new());
                }
                let mut scores = ranker::score_documents(&bag, &self.store);
                ranker::normalize_and_boost(&mut scores, &self.store);
                let ranked = ranker::rank(scores);
                let ranked_ids: Vec<u32> = ranked.iter().map(|(id, _)| *id).collect();
                self.check_cancel(cancel)?;

                let Some(augmented_bag) = feedback::refine(&bag, &ranked_ids, &self.store) else {
                    return Ok(ranked.into_iter().take(top_k).map(|(id, s)| (id, Some(s))).collect());
                };
                self.check_cancel(cancel)?;

                debug!(added = augmented_bag.len() - bag.len(), "feedback expansion");
                let mut scores2 = ranker::score_documents(&augmented_bag, &self.store);
                ranker::normalize_and_boost(&mut scores2, &self.store);
                let ranked2 = ranker::rank(scores2);
                Ok(ranked2.into_iter().take(top_k).map(|(id, s)| (id, Some(s))).collect())
            }
        }
    }

    /// Case-insensitive prefix match over the dictionary's zone-stripped
    /// terms, sorted alphabetically and truncated to `limit`.
    pub fn suggestions(&self, prefix: &str, limit: usize) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        let mut matches: Vec<&str> = self
            .store
            .bases()
            .filter(|base| base.to_lowercase().starts_with(&prefix))
            .collect();
        matches.sort_unstable();
        matches.into_iter().take(limit).map(String::from).collect()
    }
}
