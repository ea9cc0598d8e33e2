//! # Collector Benchmarks
//!
//! | Area | What is measured |
//! |------|------------------|
//! | Traversal | Seeding, observing and pruning over forked chains |
//! | Inflation | Raw tipset document to `Block` with messages |
//! | Decimal | Parsing attoFIL-sized amounts |

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scout_tests::fixtures::{raw_message, ChainFixture};
use serde_json::json;
use tipset_collector::domain::wire::RawBlock;
use tipset_collector::{inflate_block, Block, CollectionState, Decimal, DecoderTable, HeadReference};

fn inflate_fixture(chain: &ChainFixture) -> Vec<Block> {
    let decoders = DecoderTable::new();
    chain
        .blocks
        .iter()
        .map(|(cid, doc)| {
            let raw: RawBlock = serde_json::from_value(doc.clone()).unwrap();
            inflate_block(HeadReference::new(cid.as_str()), raw, &decoders).unwrap()
        })
        .collect()
}

/// Full in-memory walk: dequeue, look up, observe, until the bound is hit.
fn walk(heads: &[HeadReference], blocks: &[Block], bound: usize) -> usize {
    let index: HashMap<&HeadReference, &Block> = blocks.iter().map(|b| (&b.tipset_hash, b)).collect();
    let mut state = CollectionState::seed(heads.iter().cloned());

    while !state.bound_reached(bound) {
        let Some(head) = state.next_head() else { break };
        if let Some(block) = index.get(&head) {
            state.observe((*block).clone(), 0);
        }
    }
    let batch = state.into_stable_batch(2);
    batch.blocks.len() + batch.fetched
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("collector-traversal");

    for width in [2usize, 8, 32] {
        let chain = ChainFixture::forked(width, 8, 1_000);
        let heads: Vec<HeadReference> = chain.heads.iter().map(|h| HeadReference::new(h.as_str())).collect();
        let blocks = inflate_fixture(&chain);

        group.throughput(Throughput::Elements(blocks.len() as u64));
        for bound in [5usize, 64] {
            group.bench_with_input(
                BenchmarkId::new(format!("width_{}", width), bound),
                &bound,
                |b, &bound| b.iter(|| black_box(walk(&heads, &blocks, bound))),
            );
        }
    }

    group.finish();
}

fn bench_inflation(c: &mut Criterion) {
    let mut group = c.benchmark_group("collector-inflation");
    let decoders = DecoderTable::new().with("knownMethod", |p| json!({ "len": p.len() }));

    for count in [0usize, 10, 200] {
        let messages = (0..count)
            .map(|i| {
                let method = if i % 2 == 0 { "knownMethod" } else { "send" };
                raw_message(method, Some("0x8182"), Some("1000000000000000000"), i as u64)
            })
            .collect();
        let chain = ChainFixture::with_heads(&["A"]).tipset_with_messages("A", 100, &["B", "C"], messages);
        let raw: RawBlock = serde_json::from_value(chain.blocks["A"].clone()).unwrap();

        group.throughput(Throughput::Elements(count.max(1) as u64));
        group.bench_with_input(BenchmarkId::new("messages", count), &raw, |b, raw| {
            b.iter(|| black_box(inflate_block(HeadReference::new("A"), raw.clone(), &decoders).unwrap()))
        });
    }

    group.finish();
}

fn bench_decimal(c: &mut Criterion) {
    let mut group = c.benchmark_group("collector-decimal");
    for literal in ["0", "1000000000000000000", "0.000000001", "115792089237316195423570985008687907853"] {
        group.bench_with_input(BenchmarkId::new("parse", literal.len()), literal, |b, s| {
            b.iter(|| black_box(s.parse::<Decimal>().unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_traversal, bench_inflation, bench_decimal);
criterion_main!(benches);
