// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! The on-disk dictionary: `<zoned_term> <doc_frequency> <byte_offset>` per line.
//!
//! At load time we also derive `base -> zones`, the map from a bare stem to
//! every zoned term that shares it. This lets single-stem query atoms look
//! up postings across all zones without rescanning the whole dictionary on
//! every query.

use crate::error::{EngineError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
pub struct DictEntry {
    pub doc_freq: u32,
    pub offset: u64,
}

#[derive(Debug, Default)]
pub struct Dictionary {
    terms: HashMap<String, DictEntry>,
    base_to_zones: HashMap<String, Vec<String>>,
}

/// Split a zoned term `stem@zone` into its base stem.
///
/// Terms without an `@` are treated as their own base (defensive; the
/// builder always emits zoned terms, but a hand-edited fixture might not).
pub fn base_of(zoned_term: &str) -> &str {
    zoned_term.split('@').next().unwrap_or(zoned_term)
}

/// Split a zoned term `stem@zone` into its zone, defaulting to `"content"`
/// when the term carries no zone tag.
pub fn zone_of(zoned_term: &str) -> &str {
    match zoned_term.split_once('@') {
        Some((_, zone)) => zone,
        None => "content",
    }
}

impl Dictionary {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut terms = HashMap::new();
        let mut base_to_zones: HashMap<String, Vec<String>> = HashMap::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (term, df, offset) = match (parts.next(), parts.next(), parts.next()) {
                (Some(t), Some(d), Some(o)) => (t, d, o),
                _ => {
                    return Err(EngineError::IndexCorrupt {
                        path: path.to_path_buf(),
                        line: line_no + 1,
                        reason: "expected `<zoned_term> <doc_frequency> <byte_offset>`".into(),
                    })
                }
            };
            let doc_freq: u32 = df.parse().map_err(|_| EngineError::IndexCorrupt {
                path: path.to_path_buf(),
                line: line_no + 1,
                reason: format!("doc_frequency {df:?} is not a u32"),
            })?;
            let offset: u64 = offset.parse().map_err(|_| EngineError::IndexCorrupt {
                path: path.to_path_buf(),
                line: line_no + 1,
                reason: format!("byte_offset {offset:?} is not a u64"),
            })?;

            base_to_zones
                .entry(base_of(term).to_string())
                .or_default()
                .push(term.to_string());
            terms.insert(term.to_string(), DictEntry { doc_freq, offset });
        }

        // Deterministic zone order regardless of on-disk ordering.
        for zones in base_to_zones.values_mut() {
            zones.sort();
        }

        Ok(Dictionary {
            terms,
            base_to_zones,
        })
    }

    pub fn get(&self, zoned_term: &str) -> Option<DictEntry> {
        self.terms.get(zoned_term).copied()
    }

    pub fn zones_of(&self, base: &str) -> &[String] {
        self.base_to_zones
            .get(base)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All zone-stripped bases, for prefix-based autocomplete.
    pub fn bases(&self) -> impl Iterator<Item = &str> {
        self.base_to_zones.keys().map(String::as_str)
    }

    /// Every zoned term on record, e.g. for scanning the full vocabulary
    /// during feedback-vector construction.
    pub fn zoned_terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn doc_freq(&self, zoned_term: &str) -> Option<u32> {
        self.terms.get(zoned_term).map(|e| e.doc_freq)
    }
}

pub fn default_or(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("dictionary.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_terms_and_derives_zones() {
        let f = write_fixture("liabil@title 3 0\nliabil@content 10 42\n\ndamag@content 5 100\n");
        let dict = Dictionary::load(f.path()).unwrap();

        assert_eq!(dict.get("liabil@title").unwrap().doc_freq, 3);
        assert_eq!(dict.get("liabil@content").unwrap().offset, 42);
        assert_eq!(
            dict.zones_of("liabil"),
            &["liabil@content".to_string(), "liabil@title".to_string()]
        );
        assert_eq!(dict.zones_of("damag"), &["damag@content".to_string()]);
        assert!(dict.zones_of("missing").is_empty());
    }

    #[test]
    fn malformed_line_is_index_corrupt() {
        let f = write_fixture("liabil@title notanumber 0\n");
        let err = Dictionary::load(f.path()).unwrap_err();
        assert!(matches!(err, EngineError::IndexCorrupt { .. }));
    }

    #[test]
    fn base_and_zone_helpers() {
        assert_eq!(base_of("liabil@title"), "liabil");
        assert_eq!(zone_of("liabil@title"), "title");
        assert_eq!(zone_of("liabil"), "content");
    }
}
