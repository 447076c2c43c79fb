//! # Signer Recovery Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | EIP-191 message hash | < 10μs |
//! | Signer recovery (65-byte) | < 500μs |
//! | Signature check through the account service | < 1ms |

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use account_runtime::adapters::SignatureAdapter;
use td_01_signature_verification::test_helpers::{generate_keypair, sign};
use td_01_signature_verification::{
    address_from_pubkey, encode_signature, hash_message, recover_signer, verify_signer,
};
use td_02_user_accounts::SignatureVerifier;

const CHALLENGE: &str = "Trustdrops login";

fn signed_challenge() -> (String, String) {
    let (signing_key, verifying_key) = generate_keypair();
    let signature = sign(&hash_message(CHALLENGE.as_bytes()), &signing_key);
    (
        address_from_pubkey(&verifying_key).to_checksum(),
        encode_signature(&signature),
    )
}

fn bench_hash_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("td-01-hash-message");
    let mut rng = rand::thread_rng();

    for size in [16usize, 256, 4096] {
        let message: Vec<u8> = (0..size).map(|_| rng.gen()).collect();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &message, |b, m| {
            b.iter(|| black_box(hash_message(m)))
        });
    }

    group.finish();
}

fn bench_recover_signer(c: &mut Criterion) {
    let mut group = c.benchmark_group("td-01-recover-signer");
    group.measurement_time(Duration::from_secs(10));

    let (address, signature) = signed_challenge();

    group.bench_function("recover", |b| {
        b.iter(|| black_box(recover_signer(CHALLENGE, &signature)))
    });

    group.bench_function("verify_valid", |b| {
        b.iter(|| black_box(verify_signer(CHALLENGE, &signature, &address).is_valid()))
    });

    let (other, _) = signed_challenge();
    group.bench_function("verify_wrong_signer", |b| {
        b.iter(|| black_box(verify_signer(CHALLENGE, &signature, &other).is_valid()))
    });

    group.bench_function("reject_malformed", |b| {
        b.iter(|| black_box(recover_signer(CHALLENGE, "0xdeadbeef").is_err()))
    });

    group.finish();
}

fn bench_adapter(c: &mut Criterion) {
    let mut group = c.benchmark_group("account-runtime-signature-adapter");
    let adapter = SignatureAdapter::new();

    for batch in [1usize, 10, 100] {
        let signatures: Vec<String> = (0..batch).map(|_| signed_challenge().1).collect();
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::new("batch", batch), &signatures, |b, sigs| {
            b.iter(|| {
                for signature in sigs {
                    black_box(adapter.recover_signer(CHALLENGE, signature).ok());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hash_message,
    bench_recover_signer,
    bench_adapter
);
criterion_main!(benches);
