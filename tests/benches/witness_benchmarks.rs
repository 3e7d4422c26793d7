//! # Witness-Net Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | shared-types | block id derivation |
//! | wn-03 Block Store | put (new / duplicate), get |
//! | wn-02 Signature Service | attest, verify attestation |
//! | wn-05 Availability Query | exact lookup vs. full scan |

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_types::{Block, ContentType};
use wn_02_signature_service::{NodeIdentity, SignatureApi, SignatureService};
use wn_03_block_store::{BlockStore, InMemoryBlockStore, StoreConfig};
use wn_04_node_service::NodeService;
use wn_05_availability_query::{AvailabilityQuery, AvailabilityQueryHandler, BlockTemplate};

fn random_block(size: usize) -> Block {
    let mut rng = rand::thread_rng();
    Block::raw((0..size).map(|_| rng.gen()).collect::<Vec<u8>>())
}

fn bench_block_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("block-id");
    for size in [64, 4 * 1024, 256 * 1024] {
        let block = random_block(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &block, |b, block| {
            b.iter(|| black_box(block.id()))
        });
    }
    group.finish();
}

fn bench_block_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("wn-03-block-store");

    group.bench_function("put_new", |b| {
        let store = InMemoryBlockStore::new(StoreConfig::default());
        b.iter_batched(
            || random_block(256),
            |block| black_box(store.put(block).is_ok()),
            criterion::BatchSize::SmallInput,
        )
    });

    let store = InMemoryBlockStore::new(StoreConfig::default());
    let block = Block::new(ContentType::Text, b"already stored".to_vec());
    let id = store.put(block.clone()).unwrap_or_else(|_| block.id());

    group.bench_function("put_duplicate", |b| {
        b.iter(|| black_box(store.put(block.clone()).is_ok()))
    });
    group.bench_function("get", |b| b.iter(|| black_box(store.get(&id).is_ok())));
    group.finish();
}

fn bench_attestation(c: &mut Criterion) {
    let mut group = c.benchmark_group("wn-02-signature-service");
    let signer = SignatureService::new(Arc::new(NodeIdentity::generate("wilbur")));
    let key = signer.public_key();
    let id = random_block(256).id();
    let attestation = signer.attest(&id);

    group.bench_function("attest", |b| b.iter(|| black_box(signer.attest(&id))));
    group.bench_function("verify_attestation", |b| {
        b.iter(|| black_box(signer.verify_attestation(&attestation, &key).is_ok()))
    });
    group.finish();
}

fn bench_availability_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("wn-05-availability-query");

    for stored in [100, 1_000, 10_000] {
        let signer = Arc::new(SignatureService::new(Arc::new(NodeIdentity::generate(
            "wilbur",
        ))));
        let store: Arc<dyn BlockStore> = Arc::new(InMemoryBlockStore::new(StoreConfig::default()));
        let node = NodeService::new(store, Arc::clone(&signer));
        if node
            .register_query_handler(Arc::new(AvailabilityQueryHandler::new(signer)))
            .is_err()
        {
            return;
        }

        let mut target = None;
        for i in 0..stored {
            let block = Block::text(format!("block {i}"));
            if i == stored / 2 {
                target = Some(block.clone());
            }
            let _ = node.on_block_received(block);
        }
        let Some(target) = target else { return };

        let exact = AvailabilityQuery::new(BlockTemplate::exact(&target)).into_query();
        let scan = AvailabilityQuery::new(
            BlockTemplate::any().with_payload(target.payload.clone()),
        )
        .into_query();

        group.bench_with_input(BenchmarkId::new("exact", stored), &exact, |b, q| {
            b.iter(|| black_box(node.on_query(q).map(|r| r.len())))
        });
        group.bench_with_input(BenchmarkId::new("scan", stored), &scan, |b, q| {
            b.iter(|| black_box(node.on_query(q).map(|r| r.len())))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_block_id,
    bench_block_store,
    bench_attestation,
    bench_availability_query
);
criterion_main!(benches);
