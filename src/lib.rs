// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Caselex: a positional, zone-aware inverted-index retrieval engine for
//! legal-document search.
//!
//! Reads a dictionary/postings/metadata triple produced by an external
//! index builder and serves boolean and free-text queries against it,
//! with zoned tf-idf ranking, court/date boosts, and Rocchio
//! pseudo-relevance feedback on free-text queries. See [`Engine`] for the
//! entry point.

pub mod boolean;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod observer;
pub mod query;
pub mod ranker;
mod stemmer;
pub mod store;

pub use engine::{CancelToken, Engine, SearchHit};
pub use error::{EngineError, Result};
