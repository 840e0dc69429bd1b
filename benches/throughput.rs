use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use treehash::{Hasher, CHUNK_LEN, KEY_LEN};

fn input(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    for &len in &[64usize, CHUNK_LEN, 16 * CHUNK_LEN, 1024 * CHUNK_LEN] {
        let data = input(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("hash", len), &data, |b, data| {
            b.iter(|| {
                let mut hasher = Hasher::new();
                hasher.update(data);
                hasher.finalize()
            });
        });
        group.bench_with_input(BenchmarkId::new("keyed_hash", len), &data, |b, data| {
            let key = [7u8; KEY_LEN];
            b.iter(|| treehash::keyed_hash(&key, data));
        });
    }
    group.finish();
}

fn bench_small_writes(c: &mut Criterion) {
    let data = input(64 * CHUNK_LEN);
    let mut group = c.benchmark_group("small_writes");
    group.throughput(Throughput::Bytes(data.len() as u64));
    for &write in &[1usize, 13, 64, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(write), &write, |b, &write| {
            b.iter(|| {
                let mut hasher = Hasher::new();
                for piece in data.chunks(write) {
                    hasher.update(piece);
                }
                hasher.finalize()
            });
        });
    }
    group.finish();
}

fn bench_xof(c: &mut Criterion) {
    let mut hasher = Hasher::new();
    hasher.update(&input(CHUNK_LEN));
    let mut group = c.benchmark_group("xof");
    for &out_len in &[32usize, 1024, 64 * 1024] {
        group.throughput(Throughput::Bytes(out_len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(out_len), &out_len, |b, &out_len| {
            let mut out = vec![0u8; out_len];
            b.iter(|| hasher.finalize_into(&mut out));
        });
    }
    group.finish();
}

fn bench_derive_key(c: &mut Criterion) {
    c.bench_function("derive_key", |b| {
        b.iter(|| treehash::derive_key("treehash 2024-05-01 bench context", b"key material"));
    });
}

criterion_group!(benches, bench_update, bench_small_writes, bench_xof, bench_derive_key);
criterion_main!(benches);
