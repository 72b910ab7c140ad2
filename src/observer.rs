// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! A thin callback interface for counters the engine reports as it works,
//! without reaching for a process-global singleton.
//!
//! Callers that don't care pass [`NoopObserver`]; the CLI passes
//! [`TracingObserver`], which turns each event into a `tracing` call so it
//! shows up wherever the embedding binary already sends its logs.

use std::time::Duration;

pub trait SearchObserver: Send + Sync {
    /// A postings line failed to decode mid-query. The query still
    /// completes; this term just contributes nothing.
    fn on_postings_decode_failure(&self, _zoned_term: &str) {}

    /// One full `Engine::search` call finished successfully.
    fn on_query_evaluated(&self, _elapsed: Duration) {}
}

#[derive(Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

#[derive(Debug, Default)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_postings_decode_failure(&self, zoned_term: &str) {
        tracing::warn!(term = zoned_term, "postings line failed to decode, treating as empty");
    }

    fn on_query_evaluated(&self, elapsed: Duration) {
        tracing::debug!(elapsed_ms = elapsed.as_secs_f64() * 1000.0, "query evaluated");
    }
}
