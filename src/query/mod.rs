// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tokenizing, normalizing, stemming, and classifying a raw query string.
//!
//! A query is boolean if the literal, whitespace-delimited token `AND`
//! appears anywhere in it; otherwise it is free-text. Boolean queries are
//! parsed into a postfix atom sequence via [`shunting_yard`]; free-text
//! queries collapse straight into a stem frequency bag.

mod shunting_yard;

use crate::error::{EngineError, Result};
use crate::stemmer;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// A leaf in the boolean query tree: a single stemmed term or a phrase
/// (an ordered sequence of stems that must appear at consecutive
/// positions in the same zone).
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Term(String),
    Phrase(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone)]
pub enum InfixToken {
    Operand(Operand),
    Op(OpKind),
}

#[derive(Debug, Clone)]
pub enum PostfixToken {
    Operand(Operand),
    Op(OpKind),
}

#[derive(Debug, Clone)]
pub enum ParsedQuery {
    Boolean {
        postfix: Vec<PostfixToken>,
        bag: HashMap<String, u32>,
    },
    FreeText {
        bag: HashMap<String, u32>,
    },
}

static BOOLEAN_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]+"|\S+"#).unwrap());
static FREE_TEXT_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

pub fn parse(query: &str) -> Result<ParsedQuery> {
    let is_boolean = query.split_whitespace().any(|t| t == "AND");
    if is_boolean {
        parse_boolean(query)
    } else {
        Ok(ParsedQuery::FreeText {
            bag: parse_free_text_bag(query),
        })
    }
}

pub fn parse_free_text_bag(query: &str) -> HashMap<String, u32> {
    let mut bag = HashMap::new();
    for word in FREE_TEXT_WORD.find_iter(&query.to_lowercase()) {
        let stem = stemmer::stem(word.as_str());
        if stem.is_empty() {
            continue;
        }
        *bag.entry(stem).or_insert(0) += 1;
    }
    bag
}

fn parse_boolean(query: &str) -> Result<ParsedQuery> {
    if query.matches('"').count() % 2 != 0 {
        return Err(EngineError::QuerySyntax("unbalanced quotes".into()));
    }

    let mut infix = Vec::new();
    let mut bag: HashMap<String, u32> = HashMap::new();

    for raw in BOOLEAN_SPLIT.find_iter(query).map(|m| m.as_str()) {
        match raw.to_uppercase().as_str() {
            "AND" => infix.push(InfixToken::Op(OpKind::And)),
            "OR" => infix.push(InfixToken::Op(OpKind::Or)),
            "NOT" => infix.push(InfixToken::Op(OpKind::Not)),
            _ if raw.starts_with('"') && raw.ends_with('"') && raw.len() > 2 => {
                let inner = &raw[1..raw.len() - 1];
                let stems: Vec<String> = inner
                    .split_whitespace()
                    .filter_map(stemmer::normalize_and_stem)
                    .collect();
                if stems.is_empty() {
                    return Err(EngineError::QuerySyntax(format!(
                        "empty phrase: {raw:?}"
                    )));
                }
                for s in &stems {
                    *bag.entry(s.clone()).or_insert(0) += 1;
                }
                infix.push(InfixToken::Operand(Operand::Phrase(stems)));
            }
            _ => {
                let Some(stem) = stemmer::normalize_and_stem(raw) else {
                    continue;
                };
                *bag.entry(stem.clone()).or_insert(0) += 1;
                infix.push(InfixToken::Operand(Operand::Term(stem)));
            }
        }
    }

    validate_infix(&infix)?;
    let postfix = shunting_yard::to_postfix(infix);
    Ok(ParsedQuery::Boolean { postfix, bag })
}

/// Reject dangling or misplaced operators before handing the token stream
/// to shunting-yard, which assumes well-formed input. `not` may lead or
/// follow `and`/`or`; `and`/`or` may never lead, trail, or sit next to
/// another binary operator.
fn validate_infix(tokens: &[InfixToken]) -> Result<()> {
    if !tokens.iter().any(|t| matches!(t, InfixToken::Operand(_))) {
        return Err(EngineError::QuerySyntax(
            "query contains no searchable terms".into(),
        ));
    }

    let mut prev: Option<&InfixToken> = None;
    for (i, tok) in tokens.iter().enumerate() {
        if let InfixToken::Op(op @ (OpKind::And | OpKind::Or)) = tok {
            let is_first = i == 0;
            let is_last = i == tokens.len() - 1;
            if is_first || is_last {
                return Err(EngineError::QuerySyntax(format!(
                    "dangling {op:?} operator"
                )));
            }
            if let Some(InfixToken::Op(OpKind::And | OpKind::Or)) = prev {
                return Err(EngineError::QuerySyntax(format!(
                    "{op:?} cannot follow another binary operator"
                )));
            }
        }
        prev = Some(tok);
    }
    if matches!(tokens.last(), Some(InfixToken::Op(OpKind::Not))) {
        return Err(EngineError::QuerySyntax("dangling Not operator".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_builds_stem_bag() {
        let bag = parse_free_text_bag("liability for damages, damages!");
        assert_eq!(bag.get("liabil"), Some(&1));
        assert_eq!(bag.get("damag"), Some(&2));
    }

    #[test]
    fn empty_query_is_free_text_with_empty_bag() {
        match parse("   ").unwrap() {
            ParsedQuery::FreeText { bag } => assert!(bag.is_empty()),
            _ => panic!("expected free text"),
        }
    }

    #[test]
    fn classifies_as_boolean_on_and_token() {
        match parse("liability AND damages").unwrap() {
            ParsedQuery::Boolean { postfix, bag } => {
                assert_eq!(postfix.len(), 3);
                assert_eq!(bag.len(), 2);
            }
            _ => panic!("expected boolean"),
        }
    }

    #[test]
    fn embedded_and_substring_does_not_trigger_boolean() {
        // "ANDREW" must not be misread as the operator AND.
        match parse("ANDREW v state").unwrap() {
            ParsedQuery::FreeText { .. } => {}
            _ => panic!("expected free text"),
        }
    }

    #[test]
    fn phrase_query_parses_to_phrase_operand() {
        match parse(r#""fair trial" AND justice"#).unwrap() {
            ParsedQuery::Boolean { postfix, .. } => {
                assert!(postfix.iter().any(|t| matches!(
                    t,
                    PostfixToken::Operand(Operand::Phrase(stems)) if stems.len() == 2
                )));
            }
            _ => panic!("expected boolean"),
        }
    }

    #[test]
    fn unbalanced_quotes_are_query_syntax_error() {
        let err = parse(r#""fair trial AND justice"#).unwrap_err();
        assert!(matches!(err, EngineError::QuerySyntax(_)));
    }

    #[test]
    fn dangling_operator_is_query_syntax_error() {
        let err = parse("liability AND").unwrap_err();
        assert!(matches!(err, EngineError::QuerySyntax(_)));
    }

    #[test]
    fn not_may_lead_an_operand() {
        let parsed = parse("NOT liability AND damages").unwrap();
        assert!(matches!(parsed, ParsedQuery::Boolean { .. }));
    }

    #[test]
    fn empty_phrase_token_is_silently_skipped_not_an_error() {
        match parse(r#"liability AND damages """#).unwrap() {
            ParsedQuery::Boolean { postfix, bag } => {
                assert_eq!(postfix.len(), 3);
                assert_eq!(bag.len(), 2);
            }
            _ => panic!("expected boolean"),
        }
    }
}
