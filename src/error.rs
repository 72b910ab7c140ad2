// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! The error taxonomy for index loading and query evaluation.
//!
//! Four kinds, matching the policy split between "fatal at init" and
//! "recoverable per-query":
//!
//! - [`EngineError::Io`] / [`EngineError::IndexCorrupt`] / [`EngineError::HeaderMissing`]
//!   are fatal: the engine must not start serving on these.
//! - [`EngineError::QuerySyntax`] is recoverable: callers get an empty
//!   result plus this error, not a crash.
//! - [`EngineError::Cancelled`] means cooperative cancellation fired
//!   between pipeline stages; no partial results are ever attached.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt index at {path}:{line}: {reason}")]
    IndexCorrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("postings file {path} is missing its N + doc-length header")]
    HeaderMissing { path: PathBuf },

    #[error("query syntax error: {0}")]
    QuerySyntax(String),

    #[error("query evaluation was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, EngineError>;
