// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Command-line surface for offline querying against an index triple.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "caselex", about = "Zone-aware inverted-index search over a legal-document corpus")]
pub struct Cli {
    /// Path to the dictionary file.
    #[arg(long = "dict-file", short = 'd', default_value = "dictionary.txt")]
    pub dict_file: PathBuf,

    /// Path to the postings file.
    #[arg(long = "postings-file", short = 'p', default_value = "postings.txt")]
    pub postings_file: PathBuf,

    /// Path to the metadata file.
    #[arg(long = "metadata-file", short = 'm', default_value = "metadata.tsv")]
    pub metadata_file: PathBuf,

    /// The query string to search for.
    #[arg(long = "query", short = 'q')]
    pub query: String,

    /// Number of top results to return.
    #[arg(long = "topk", default_value_t = 10)]
    pub topk: usize,

    /// Result format: one-line space-separated doc_ids, or a JSON array.
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,
}
