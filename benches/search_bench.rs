//! Benchmarks for the retrieval pipeline against synthetic legal-document
//! corpora of increasing size.
//!
//! Corpus sizes mirror realistic deployment scales:
//! - small:  ~200 docs,  ~300 terms each  (a single jurisdiction's recent docket)
//! - medium: ~2,000 docs, ~500 terms each (a multi-year regional archive)
//! - large:  ~8,000 docs, ~800 terms each (a consolidated multi-court corpus)
//!
//! Run with: cargo bench

use caselex::Engine;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::HashMap;
use std::path::PathBuf;

struct CorpusSize {
    name: &'static str,
    docs: usize,
    terms_per_doc: usize,
}

const CORPUS_SIZES: &[CorpusSize] = &[
    CorpusSize {
        name: "small",
        docs: 200,
        terms_per_doc: 300,
    },
    CorpusSize {
        name: "medium",
        docs: 2_000,
        terms_per_doc: 500,
    },
];

const LARGE_CORPUS: CorpusSize = CorpusSize {
    name: "large",
    docs: 8_000,
    terms_per_doc: 800,
};

/// Legal-domain vocabulary, pre-stemmed so the synthetic corpus matches
/// what the indexer would actually have emitted (the stemmer itself is
/// exercised separately by the query-parsing benches further below).
const VOCAB: &[&str] = &[
    "liabil", "contract", "damag", "breach", "negligen", "tort", "statut",
    "jurisdict", "appeal", "judgment", "plaintiff", "defend", "evid",
    "witness", "injunct", "remedi", "claim", "counsel", "trial", "court",
];

const COURTS: &[&str] = &[
    "SG Court of Appeal",
    "SG High Court",
    "UK Supreme Court",
    "UK High Court",
    "Federal Court of Australia",
];

/// A small deterministic linear-congruential generator, good enough to
/// shape a synthetic corpus without pulling in a `rand` dependency the
/// rest of the crate has no other use for.
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.0
    }

    fn index(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}

struct Fixture {
    dict_path: PathBuf,
    postings_path: PathBuf,
    metadata_path: PathBuf,
    _tmp: tempfile::TempDir,
}

/// Builds a dictionary/postings/metadata triple for `size`, in the exact
/// text encoding `store::postings::decode_line` expects: `gap,tf:pos,pos`
/// entries per zoned term, a `N d:len ...` header, and a TSV metadata
/// file with a court/date spread across the fixed boost table.
fn build_fixture(size: &CorpusSize) -> Fixture {
    let mut rng = Lcg(0x5EED_u64.wrapping_add(size.docs as u64));

    // doc_id -> zoned_term -> sorted positions
    let mut postings: HashMap<String, Vec<(u32, Vec<u32>)>> = HashMap::new();
    let mut lengths = String::new();

    for doc_id in 1..=size.docs as u32 {
        let mut doc_terms: HashMap<String, Vec<u32>> = HashMap::new();
        for pos in 0..size.terms_per_doc as u32 {
            let stem = VOCAB[rng.index(VOCAB.len())];
            let zone = if pos < 5 { "title" } else { "content" };
            doc_terms
                .entry(format!("{stem}@{zone}"))
                .or_default()
                .push(pos);
        }
        let norm: f64 = (doc_terms.values().map(|p| (p.len() as f64).powi(2)).sum::<f64>()).sqrt();
        lengths.push_str(&format!(" {doc_id}:{:.4}", norm.max(1.0)));

        for (zoned_term, mut positions) in doc_terms {
            positions.sort_unstable();
            postings.entry(zoned_term).or_default().push((doc_id, positions));
        }
    }

    let mut postings_body = format!("{}{}\n", size.docs, lengths);
    let mut dict_lines = Vec::new();
    for (zoned_term, mut entries) in postings {
        entries.sort_by_key(|(doc_id, _)| *doc_id);
        let offset = postings_body.len();
        dict_lines.push(format!("{zoned_term} {} {offset}", entries.len()));

        let mut prev_doc = 0u64;
        let tokens: Vec<String> = entries
            .iter()
            .map(|(doc_id, positions)| {
                let gap = *doc_id as u64 - prev_doc;
                prev_doc = *doc_id as u64;
                let mut prev_pos = 0u64;
                let pos_str: Vec<String> = positions
                    .iter()
                    .map(|&p| {
                        let delta = p as u64 - prev_pos;
                        prev_pos = p as u64;
                        delta.to_string()
                    })
                    .collect();
                format!("{gap},{}:{}", positions.len(), pos_str.join(","))
            })
            .collect();
        postings_body.push_str(&tokens.join(" "));
        postings_body.push('\n');
    }

    let mut metadata_body = String::new();
    for doc_id in 1..=size.docs as u32 {
        let court = COURTS[rng.index(COURTS.len())];
        let year = 1990 + rng.index(35);
        metadata_body.push_str(&format!("{doc_id}\t{court}\t{year}-01-01\n"));
    }

    let tmp = tempfile::tempdir().unwrap();
    let dict_path = tmp.path().join("dictionary.txt");
    let postings_path = tmp.path().join("postings.txt");
    let metadata_path = tmp.path().join("metadata.tsv");
    std::fs::write(&dict_path, dict_lines.join("\n")).unwrap();
    std::fs::write(&postings_path, postings_body).unwrap();
    std::fs::write(&metadata_path, metadata_body).unwrap();

    Fixture {
        dict_path,
        postings_path,
        metadata_path,
        _tmp: tmp,
    }
}

fn bench_free_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("free_text_search");
    for size in CORPUS_SIZES.iter().chain(std::iter::once(&LARGE_CORPUS)) {
        let fixture = build_fixture(size);
        let engine = Engine::open(&fixture.dict_path, &fixture.postings_path, &fixture.metadata_path)
            .expect("fixture index opens");

        group.throughput(Throughput::Elements(size.docs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size.name), &engine, |b, engine| {
            b.iter(|| black_box(engine.search("liability for damages in breach of contract", 20).unwrap()));
        });
    }
    group.finish();
}

fn bench_boolean_and(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean_and");
    for size in CORPUS_SIZES.iter().chain(std::iter::once(&LARGE_CORPUS)) {
        let fixture = build_fixture(size);
        let engine = Engine::open(&fixture.dict_path, &fixture.postings_path, &fixture.metadata_path)
            .expect("fixture index opens");

        group.throughput(Throughput::Elements(size.docs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size.name), &engine, |b, engine| {
            b.iter(|| black_box(engine.search("negligence AND damages AND breach", 20).unwrap()));
        });
    }
    group.finish();
}

fn bench_phrase_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("phrase_query");
    for size in CORPUS_SIZES {
        let fixture = build_fixture(size);
        let engine = Engine::open(&fixture.dict_path, &fixture.postings_path, &fixture.metadata_path)
            .expect("fixture index opens");

        group.throughput(Throughput::Elements(size.docs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size.name), &engine, |b, engine| {
            b.iter(|| black_box(engine.search(r#""breach of contract" AND damages"#, 20).unwrap()));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_free_text, bench_boolean_and, bench_phrase_query
}
criterion_main!(benches);
