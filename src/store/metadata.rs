// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Document metadata: court and filing date, used only for ranking boosts.
//!
//! The file is a TSV of `doc_id\tcourt\tdate`. It is optional - a missing
//! file warns once and every boost defaults to 1.0, per the error policy.

use crate::error::{EngineError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Reference year the date boost measures recency against. Pinned rather
/// than wall-clock derived, so a search run today and the same run next
/// year score identically against an unchanged index.
pub const REFERENCE_YEAR: i32 = 2025;

#[derive(Debug, Clone)]
pub struct DocMeta {
    pub court: String,
    pub date: String,
}

#[derive(Debug, Default)]
pub struct Metadata {
    docs: HashMap<u32, DocMeta>,
}

impl Metadata {
    /// Load the metadata TSV. A missing file is not an error: it is logged
    /// by the caller and treated as empty (all boosts default to 1.0).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Metadata::default());
        }
        let text = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut docs = HashMap::new();
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.splitn(3, '\t');
            let (doc_id, court, date) = match (fields.next(), fields.next(), fields.next()) {
                (Some(d), Some(c), Some(dt)) => (d, c, dt),
                _ => continue,
            };
            let Ok(doc_id) = doc_id.parse::<u32>() else {
                continue;
            };
            docs.insert(
                doc_id,
                DocMeta {
                    court: court.to_string(),
                    date: date.to_string(),
                },
            );
        }
        Ok(Metadata { docs })
    }

    pub fn get(&self, doc_id: u32) -> Option<&DocMeta> {
        self.docs.get(&doc_id)
    }
}

/// Court prestige boost. Courts not in the table get the default tier.
///
/// Values are carried verbatim from the reference scorer: tier 1 (1.5) for
/// apex/final-appeal courts, tier 2 (1.2) for national high/superior
/// courts, tier 3 (1.0) default for everything else.
pub fn court_boost(court: &str) -> f64 {
    match court {
        "SG Court of Appeal"
        | "SG Privy Council"
        | "UK House of Lords"
        | "UK Supreme Court"
        | "High Court of Australia"
        | "CA Supreme Court" => 1.5,

        "SG High Court"
        | "Singapore International Commercial Court"
        | "HK High Court"
        | "HK Court of First Instance"
        | "UK Crown Court"
        | "UK Court of Appeal"
        | "UK High Court"
        | "Federal Court of Australia"
        | "NSW Court of Appeal"
        | "NSW Court of Criminal Appeal"
        | "NSW Supreme Court" => 1.2,

        _ => 1.0,
    }
}

/// Recency boost from a `"YYYY-MM-DD ..."` (or bare `"YYYY-MM-DD"`) date
/// string, measured against [`REFERENCE_YEAR`]. Any parse failure - bad
/// format, non-numeric year - defaults to 1.0 rather than erroring; a
/// ranking boost is not worth failing a query over.
pub fn date_boost(date: &str, reference_year: i32) -> f64 {
    let date_part = date.split(' ').next().unwrap_or(date);
    let mut parts = date_part.splitn(3, '-');
    let year: Option<i32> = parts.next().and_then(|y| y.parse().ok());
    let Some(year) = year else {
        return 1.0;
    };

    let years_old = reference_year - year;
    if years_old <= 5 {
        1.3
    } else if years_old <= 10 {
        1.2
    } else if years_old <= 20 {
        1.1
    } else {
        1.0
    }
}
