// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Decoding of postings lines and the `N` + doc-length header.
//!
//! A postings line is `gap,tf[:pos1,pos2,...[:skip]]` entries separated by
//! whitespace, where `gap` is the delta from the previous entry's doc_id
//! (first entry's gap is the doc_id itself) and position gaps are deltas
//! from the previous position within the same entry (first position gap is
//! the position itself). `skip` is a forward stride measured in entries;
//! absent or `-1` means "no skip".
//!
//! The whole postings file is loaded once into an owned `String` behind an
//! `Arc`, rather than `memmap2`'d: mapping a file requires `unsafe`, which
//! this crate forbids outright, and an owned buffer gives the same
//! lock-free, shared, read-only-after-load property for concurrent queries.

use crate::error::{EngineError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct PostingEntry {
    pub doc_id: u32,
    pub tf: u32,
    pub positions: Vec<u32>,
    pub skip: Option<u32>,
}

/// Decode one postings line into its entries, in the order written.
///
/// Tolerates trailing blank whitespace between entries. Any malformed
/// entry fails the whole line - callers degrade to empty postings for
/// that term rather than propagate the error past a single query.
pub fn decode_line(line: &str) -> Result<Vec<PostingEntry>> {
    let mut entries = Vec::new();
    let mut doc_id: u64 = 0;

    for token in line.split_whitespace() {
        let mut fields = token.split(':');
        let head = fields.next().unwrap_or("");
        let (gap_str, tf_str) = head.split_once(',').ok_or_else(|| {
            EngineError::IndexCorrupt {
                path: Path::new("<postings>").to_path_buf(),
                line: 0,
                reason: format!("entry {token:?} is missing `gap,tf`"),
            }
        })?;
        let gap: u64 = gap_str.parse().map_err(|_| EngineError::IndexCorrupt {
            path: Path::new("<postings>").to_path_buf(),
            line: 0,
            reason: format!("gap {gap_str:?} is not a u64"),
        })?;
        let tf: u32 = tf_str.parse().map_err(|_| EngineError::IndexCorrupt {
            path: Path::new("<postings>").to_path_buf(),
            line: 0,
            reason: format!("tf {tf_str:?} is not a u32"),
        })?;
        doc_id += gap;

        let positions_field = fields.next();
        let skip_field = fields.next();

        let positions = match positions_field {
            None | Some("") => Vec::new(),
            Some(field) => {
                let mut pos: u64 = 0;
                let mut out = Vec::new();
                for p in field.split(',') {
                    let delta: u64 = p.parse().map_err(|_| EngineError::IndexCorrupt {
                        path: Path::new("<postings>").to_path_buf(),
                        line: 0,
                        reason: format!("position delta {p:?} is not a u64"),
                    })?;
                    pos += delta;
                    out.push(pos as u32);
                }
                out
            }
        };

        let skip = match skip_field {
            None => None,
            Some(s) => {
                let v: i64 = s.parse().map_err(|_| EngineError::IndexCorrupt {
                    path: Path::new("<postings>").to_path_buf(),
                    line: 0,
                    reason: format!("skip {s:?} is not an i64"),
                })?;
                if v < 0 {
                    None
                } else {
                    Some(v as u32)
                }
            }
        };

        entries.push(PostingEntry {
            doc_id: doc_id as u32,
            tf,
            positions,
            skip,
        });
    }

    Ok(entries)
}

/// Encode entries back into a postings line, canonically: the skip segment
/// is only emitted when present, and the positions segment is emitted
/// whenever it is non-empty or a skip follows it. This is a one-way inverse
/// of [`decode_line`] good enough for round-trip property tests seeded from
/// our own encoder; it does not promise byte-identity with arbitrary
/// hand-written postings files using other (equally valid) spellings of
/// "no skip".
pub fn encode_line(entries: &[PostingEntry]) -> String {
    let mut out = Vec::with_capacity(entries.len());
    let mut prev_doc: u64 = 0;
    for entry in entries {
        let gap = entry.doc_id as u64 - prev_doc;
        prev_doc = entry.doc_id as u64;

        let mut token = format!("{},{}", gap, entry.tf);
        if !entry.positions.is_empty() || entry.skip.is_some() {
            let mut prev_pos: u64 = 0;
            let pos_str: Vec<String> = entry
                .positions
                .iter()
                .map(|&p| {
                    let delta = p as u64 - prev_pos;
                    prev_pos = p as u64;
                    delta.to_string()
                })
                .collect();
            token.push(':');
            token.push_str(&pos_str.join(","));
            if let Some(skip) = entry.skip {
                token.push(':');
                token.push_str(&skip.to_string());
            }
        }
        out.push(token);
    }
    out.join(" ")
}

/// The `N d1:len1 d2:len2 ...` header line: corpus size and each
/// document's precomputed Euclidean length for normalization.
#[derive(Debug, Default)]
pub struct PostingsHeader {
    pub n: u64,
    pub lengths: HashMap<u32, f64>,
}

pub fn decode_header(line: &str) -> Result<PostingsHeader> {
    let mut parts = line.split_whitespace();
    let n: u64 = parts
        .next()
        .ok_or_else(|| EngineError::HeaderMissing {
            path: Path::new("<postings>").to_path_buf(),
        })?
        .parse()
        .map_err(|_| EngineError::HeaderMissing {
            path: Path::new("<postings>").to_path_buf(),
        })?;

    let mut lengths = HashMap::new();
    for pair in parts {
        let (doc_id, len) = pair.split_once(':').ok_or_else(|| EngineError::IndexCorrupt {
            path: Path::new("<postings>").to_path_buf(),
            line: 1,
            reason: format!("length entry {pair:?} is missing `:`"),
        })?;
        let doc_id: u32 = doc_id.parse().map_err(|_| EngineError::IndexCorrupt {
            path: Path::new("<postings>").to_path_buf(),
            line: 1,
            reason: format!("doc_id {doc_id:?} is not a u32"),
        })?;
        let len: f64 = len.parse().map_err(|_| EngineError::IndexCorrupt {
            path: Path::new("<postings>").to_path_buf(),
            line: 1,
            reason: format!("length {len:?} is not a f64"),
        })?;
        lengths.insert(doc_id, len);
    }

    Ok(PostingsHeader { n, lengths })
}

/// The postings file, loaded fully into memory once at open time.
///
/// Random access by byte offset is done directly against the owned
/// buffer: slice from `offset` to the next `\n` (or end of file). No
/// locking and no copying on the read path - every query shares the same
/// `Arc<str>`.
pub struct PostingsFile {
    buf: Arc<str>,
    pub header: PostingsHeader,
}

impl PostingsFile {
    pub fn open(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut lines = text.lines();
        let header_line = lines.next().ok_or_else(|| EngineError::HeaderMissing {
            path: path.to_path_buf(),
        })?;
        let header = decode_header(header_line).map_err(|e| retag_path(e, path))?;

        Ok(PostingsFile {
            buf: Arc::from(text.as_str()),
            header,
        })
    }

    /// Decode the postings line starting at `offset`. A decode failure
    /// here is the caller's concern (degrade to empty + count it) rather
    /// than this type's - the buffer itself is always valid UTF-8 once
    /// loaded.
    pub fn line_at(&self, offset: u64) -> Result<Vec<PostingEntry>> {
        let start = offset as usize;
        if start > self.buf.len() {
            return Ok(Vec::new());
        }
        let rest = &self.buf[start..];
        let end = rest.find('\n').unwrap_or(rest.len());
        decode_line(&rest[..end])
    }

    pub fn doc_length(&self, doc_id: u32) -> f64 {
        self.header.lengths.get(&doc_id).copied().unwrap_or(1.0)
    }

    pub fn n(&self) -> u64 {
        self.header.n
    }
}

fn retag_path(err: EngineError, path: &Path) -> EngineError {
    match err {
        EngineError::HeaderMissing { .. } => EngineError::HeaderMissing {
            path: path.to_path_buf(),
        },
        EngineError::IndexCorrupt { line, reason, .. } => EngineError::IndexCorrupt {
            path: path.to_path_buf(),
            line,
            reason,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bare_entry() {
        let entries = decode_line("5,3").unwrap();
        assert_eq!(
            entries,
            vec![PostingEntry {
                doc_id: 5,
                tf: 3,
                positions: vec![],
                skip: None,
            }]
        );
    }

    #[test]
    fn decodes_positions_and_skip() {
        let entries = decode_line("5,3:1,2,3:7 2,1:0").unwrap();
        assert_eq!(entries[0].doc_id, 5);
        assert_eq!(entries[0].positions, vec![1, 3, 6]);
        assert_eq!(entries[0].skip, Some(7));
        assert_eq!(entries[1].doc_id, 7);
        assert_eq!(entries[1].positions, vec![0]);
        assert_eq!(entries[1].skip, None);
    }

    #[test]
    fn decodes_skip_without_positions() {
        let entries = decode_line("5,3::7").unwrap();
        assert_eq!(entries[0].positions, Vec::<u32>::new());
        assert_eq!(entries[0].skip, Some(7));
    }

    #[test]
    fn negative_one_skip_means_none() {
        let entries = decode_line("5,3:1:-1").unwrap();
        assert_eq!(entries[0].skip, None);
    }

    #[test]
    fn malformed_entry_errors() {
        assert!(decode_line("nogap").is_err());
    }

    #[test]
    fn round_trips_through_our_own_encoder() {
        let entries = vec![
            PostingEntry {
                doc_id: 5,
                tf: 3,
                positions: vec![1, 3, 6],
                skip: Some(7),
            },
            PostingEntry {
                doc_id: 7,
                tf: 1,
                positions: vec![0],
                skip: None,
            },
        ];
        let line = encode_line(&entries);
        let decoded = decode_line(&line).unwrap();
        assert_eq!(decoded, entries);
        assert_eq!(encode_line(&decoded), line);
    }

    #[test]
    fn decodes_header() {
        let header = decode_header("3 1:2.5 2:1.0").unwrap();
        assert_eq!(header.n, 3);
        assert_eq!(header.lengths.get(&1), Some(&2.5));
        assert_eq!(header.lengths.get(&2), Some(&1.0));
    }
}
