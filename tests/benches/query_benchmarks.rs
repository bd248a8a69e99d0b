//! # State-Query Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | sq-01 Codec | Envelope encoding and query id derivation |
//! | sq-01 Codec | Proof decoding |
//! | sq-02 Gateway | Issue + deliver round trip |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_bus::InMemoryEventBus;
use shared_types::{CallContext, QueryRequest, QueryResponse};
use sq_01_query_codec::{
    decode_results_exact, derive_envelope, derive_query_id, encode_envelope, encode_results,
};
use sq_02_gateway::{
    GatewayApi, GatewayConfig, GatewayService, MockCallback, QueryCallback, StaticLightClient,
};
use std::sync::{Arc, Weak};
use std::time::Duration;

const CONSUMER: [u8; 20] = [0xCC; 20];
const LIGHT_CLIENT: [u8; 20] = [0xA1; 20];

fn bundle(size: usize) -> Vec<QueryRequest> {
    (0..size)
        .map(|i| QueryRequest::new(1, [i as u8; 20], 10_000 + i as u64, [i as u8; 32]))
        .collect()
}

// ============================================================================
// SQ-01: Identifier derivation
// ============================================================================

fn bench_query_id_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("sq-01-query-id");
    group.measurement_time(Duration::from_secs(5));

    for size in [1usize, 8, 64] {
        let envelope = derive_envelope(CONSUMER, bundle(size), vec![0u8; 96], LIGHT_CLIENT);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("encode_envelope", size), &envelope, |b, env| {
            b.iter(|| black_box(encode_envelope(env)))
        });
        group.bench_with_input(BenchmarkId::new("derive_query_id", size), &envelope, |b, env| {
            let mut nonce = 0u64;
            b.iter(|| {
                nonce += 1;
                black_box(derive_query_id(env, nonce))
            })
        });
    }

    group.finish();
}

// ============================================================================
// SQ-01: Proof decoding
// ============================================================================

fn bench_proof_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("sq-01-proof-decoding");

    for size in [1usize, 8, 64] {
        let results: Vec<Vec<u8>> = (0..size).map(|i| vec![i as u8; 32]).collect();
        let proof = encode_results(&results);
        group.throughput(Throughput::Bytes(proof.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode_results_exact", size), &proof, |b, p| {
            b.iter(|| black_box(decode_results_exact(p, size)))
        });
    }

    group.finish();
}

// ============================================================================
// SQ-02: Gateway round trip
// ============================================================================

fn bench_gateway_round_trip(c: &mut Criterion) {
    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => runtime,
        Err(_) => return,
    };
    let gateway = GatewayService::with_flat_fees(
        GatewayConfig::for_testing(),
        Arc::new(InMemoryEventBus::new()),
    );
    gateway.register_light_client(LIGHT_CLIENT, Arc::new(StaticLightClient::accepting()));
    let callback = Arc::new(MockCallback::default());
    let weak: Weak<dyn QueryCallback> = Arc::downgrade(&callback);
    gateway.bind_callback(CONSUMER, weak);

    let requests = bundle(4);
    let proof = encode_results(&vec![vec![1u8; 32]; 4]);
    let user = CallContext::new([0x11; 20], 1_000).forward(CONSUMER);
    let relayer = CallContext::new([0x22; 20], 1_010);

    c.bench_function("sq-02-issue-and-deliver", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let query_id = gateway
                    .send_query(&user, requests.clone(), Vec::new(), LIGHT_CLIENT)
                    .await
                    .map_err(|e| e.to_string())?;
                gateway
                    .receive_query(
                        &relayer,
                        QueryResponse {
                            query_id,
                            proof: proof.clone(),
                        },
                    )
                    .await
                    .map_err(|e| e.to_string())
            })
        })
    });
}

criterion_group!(
    benches,
    bench_query_id_derivation,
    bench_proof_decoding,
    bench_gateway_round_trip
);
criterion_main!(benches);
